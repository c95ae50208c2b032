//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Uses both custom validators and the `validator` crate for derive macros.

use crate::errors::DomainError;
use validator::{Validate, ValidationErrors};

/// Largest amount a `NUMERIC(10, 2)` column holds
pub const MAX_AMOUNT: f64 = 99_999_999.99;

/// Validate that every food nutrient is still greater than zero once rounded
/// to cents, and fits the column
pub fn validate_food_nutrients(
    proteins: f64,
    carbohydrates: f64,
    fats: f64,
    calories: f64,
) -> Result<(), String> {
    let all_positive = [proteins, carbohydrates, fats, calories]
        .iter()
        .all(|value| value.is_finite() && (value * 100.0).round() >= 1.0 && *value <= MAX_AMOUNT);

    if all_positive {
        Ok(())
    } else {
        Err(format!(
            "Please provide all the food nutrients with values greater than zero \
             and at most {}: (proteins, carbohydrates, fats, calories)",
            MAX_AMOUNT
        ))
    }
}

/// Map an accepted image MIME type to the file extension used on disk
pub fn image_extension(content_type: &str) -> Result<&'static str, DomainError> {
    match content_type.to_lowercase().as_str() {
        "image/jpg" => Ok("jpg"),
        "image/jpeg" => Ok("jpeg"),
        "image/png" => Ok("png"),
        "image/gif" => Ok("gif"),
        other => Err(DomainError::UnsupportedImageType(other.to_string())),
    }
}

/// Validate a parent payload and each of its child payloads
///
/// Errors name the offending collection entry, e.g. `dietDetails[2]`.
pub fn validate_aggregate<P, C>(
    parent_label: &str,
    parent: &P,
    children_label: &str,
    children: &[C],
) -> Result<(), String>
where
    P: Validate,
    C: Validate,
{
    parent
        .validate()
        .map_err(|e| format!("{}: {}", parent_label, format_validation_errors(&e)))?;

    for (index, child) in children.iter().enumerate() {
        child.validate().map_err(|e| {
            format!(
                "{}[{}]: {}",
                children_label,
                index,
                format_validation_errors(&e)
            )
        })?;
    }

    Ok(())
}

/// Flatten `validator` errors into a single readable line
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let codes: Vec<String> = errs
                .iter()
                .map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => err.code.to_string(),
                })
                .collect();
            format!("{} ({})", field, codes.join(", "))
        })
        .collect();
    messages.sort();
    format!("invalid fields: {}", messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DietFoodDetailInput, DietInput, ExerciseInput};
    use proptest::prelude::*;
    use rstest::rstest;

    fn detail(food_id: i64, grams: f64) -> DietFoodDetailInput {
        DietFoodDetailInput {
            food_id,
            desired_grams: grams,
            proteins: 10.0,
            carbohydrates: 20.0,
            fats: 5.0,
            calories: 165.0,
        }
    }

    #[test]
    fn test_validate_food_nutrients() {
        assert!(validate_food_nutrients(1.0, 2.0, 3.0, 4.0).is_ok());
        assert!(validate_food_nutrients(0.0, 2.0, 3.0, 4.0).is_err());
        assert!(validate_food_nutrients(1.0, -2.0, 3.0, 4.0).is_err());
        assert!(validate_food_nutrients(1.0, 2.0, f64::NAN, 4.0).is_err());
        assert!(validate_food_nutrients(1.0, 2.0, 3.0, f64::INFINITY).is_err());
    }

    #[rstest]
    #[case(0.001)]
    #[case(0.004)]
    #[case(1e9)]
    #[case(MAX_AMOUNT + 1.0)]
    fn test_nutrients_outside_the_column_are_rejected(#[case] calories: f64) {
        assert!(validate_food_nutrients(1.0, 2.0, 3.0, calories).is_err());
    }

    #[test]
    fn test_nutrients_at_the_column_bounds_are_accepted() {
        assert!(validate_food_nutrients(0.01, 0.5, 3.0, MAX_AMOUNT).is_ok());
    }

    #[test]
    fn test_detail_amounts_must_fit_the_column() {
        assert!(detail(1, MAX_AMOUNT).validate().is_ok());
        assert!(detail(1, 1e9).validate().is_err());

        let mut heavy = detail(1, 100.0);
        heavy.calories = 1e12;
        assert!(heavy.validate().is_err());
    }

    #[rstest]
    #[case("image/jpg", "jpg")]
    #[case("image/jpeg", "jpeg")]
    #[case("image/png", "png")]
    #[case("IMAGE/GIF", "gif")]
    fn test_image_extension_accepts_images(#[case] content_type: &str, #[case] expected: &str) {
        assert_eq!(image_extension(content_type).unwrap(), expected);
    }

    #[rstest]
    #[case("application/pdf")]
    #[case("image/svg+xml")]
    #[case("text/plain")]
    #[case("")]
    fn test_image_extension_rejects_other_types(#[case] content_type: &str) {
        assert!(matches!(
            image_extension(content_type),
            Err(DomainError::UnsupportedImageType(_))
        ));
    }

    #[test]
    fn test_validate_aggregate_accepts_empty_children() {
        let diet = DietInput {
            id: None,
            description: "Cutting phase".to_string(),
        };
        let details: Vec<DietFoodDetailInput> = Vec::new();
        assert!(validate_aggregate("diet", &diet, "dietDetails", &details).is_ok());
    }

    #[test]
    fn test_validate_aggregate_names_the_bad_child() {
        let diet = DietInput {
            id: None,
            description: "Bulking".to_string(),
        };
        let details = vec![detail(1, 100.0), detail(2, -5.0)];

        let err = validate_aggregate("diet", &diet, "dietDetails", &details).unwrap_err();
        assert!(err.starts_with("dietDetails[1]"), "got: {}", err);
        assert!(err.contains("desired"), "got: {}", err);
    }

    #[test]
    fn test_validate_aggregate_rejects_long_parent() {
        let exercise = ExerciseInput {
            name: "x".repeat(81),
        };
        let children: Vec<DietFoodDetailInput> = Vec::new();
        let err = validate_aggregate("exercise", &exercise, "bodyAreaDetails", &children)
            .unwrap_err();
        assert!(err.starts_with("exercise:"), "got: {}", err);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_diet_description_up_to_250_chars_is_valid(len in 1usize..=250) {
            let diet = DietInput { id: None, description: "a".repeat(len) };
            prop_assert!(diet.validate().is_ok());
        }

        #[test]
        fn prop_diet_description_over_250_chars_is_invalid(len in 251usize..600) {
            let diet = DietInput { id: None, description: "a".repeat(len) };
            prop_assert!(diet.validate().is_err());
        }

        #[test]
        fn prop_positive_nutrients_are_valid(
            p in 0.01f64..500.0,
            c in 0.01f64..500.0,
            f in 0.01f64..500.0,
            cal in 0.01f64..5000.0
        ) {
            prop_assert!(validate_food_nutrients(p, c, f, cal).is_ok());
        }
    }
}
