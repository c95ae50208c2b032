//! Static model registry
//!
//! Every seedable model is declared here with its table, id kind, seedable
//! properties and relations. Table and column names are only ever taken from
//! this registry when building SQL.

use serde::Serialize;

/// How a model's primary key is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// BIGSERIAL
    Serial,
    /// UUID with a database default
    Uuid,
}

/// How a rendered template is converted before insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Decimal,
    Boolean,
    Uuid,
    /// Plain text password, hashed with argon2 before insert
    Password,
    /// `REGULAR` or `PREMIUM`
    CustomerType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDef {
    /// Property name as it appears in template files
    pub name: &'static str,
    pub column: &'static str,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    BelongsTo,
    HasMany,
}

/// A relation to another model.
///
/// `foreign_key` always names the column holding the reference: on this
/// model's table for `BelongsTo`, on the related model's table for `HasMany`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub kind: RelationKind,
    pub model: &'static str,
    pub foreign_key: &'static str,
}

/// Simple seeds have no relations, complex seeds have at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedKind {
    Simple,
    Complex,
}

#[derive(Debug)]
pub struct ModelDefinition {
    pub name: &'static str,
    pub table: &'static str,
    pub id_kind: IdKind,
    pub properties: &'static [PropertyDef],
    pub relations: &'static [Relation],
}

impl ModelDefinition {
    pub fn seed_kind(&self) -> SeedKind {
        if self.relations.is_empty() {
            SeedKind::Simple
        } else {
            SeedKind::Complex
        }
    }

    pub fn belongs_to(&self) -> impl Iterator<Item = &'static Relation> {
        self.relations
            .iter()
            .filter(|r| r.kind == RelationKind::BelongsTo)
    }

    pub fn has_many(&self) -> impl Iterator<Item = &'static Relation> {
        self.relations
            .iter()
            .filter(|r| r.kind == RelationKind::HasMany)
    }

    pub fn property(&self, name: &str) -> Option<&'static PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }
}

const fn prop(name: &'static str, column: &'static str, kind: ColumnKind) -> PropertyDef {
    PropertyDef { name, column, kind }
}

const fn belongs_to(model: &'static str, foreign_key: &'static str) -> Relation {
    Relation {
        kind: RelationKind::BelongsTo,
        model,
        foreign_key,
    }
}

const fn has_many(model: &'static str, foreign_key: &'static str) -> Relation {
    Relation {
        kind: RelationKind::HasMany,
        model,
        foreign_key,
    }
}

const ACCOUNT_PROPERTIES: [PropertyDef; 5] = [
    prop("email", "email", ColumnKind::Text),
    prop("password", "password_hash", ColumnKind::Password),
    prop("name", "name", ColumnKind::Text),
    prop("lastName", "last_name", ColumnKind::Text),
    prop("username", "username", ColumnKind::Text),
];

const NUTRIENTS: [PropertyDef; 4] = [
    prop("proteins", "proteins", ColumnKind::Decimal),
    prop("carbohydrates", "carbohydrates", ColumnKind::Decimal),
    prop("fats", "fats", ColumnKind::Decimal),
    prop("calories", "calories", ColumnKind::Decimal),
];

pub static MODELS: &[ModelDefinition] = &[
    ModelDefinition {
        name: "Administrator",
        table: "administrators",
        id_kind: IdKind::Uuid,
        properties: &ACCOUNT_PROPERTIES,
        relations: &[],
    },
    ModelDefinition {
        name: "Customer",
        table: "customers",
        id_kind: IdKind::Uuid,
        properties: &[
            ACCOUNT_PROPERTIES[0],
            ACCOUNT_PROPERTIES[1],
            ACCOUNT_PROPERTIES[2],
            ACCOUNT_PROPERTIES[3],
            ACCOUNT_PROPERTIES[4],
            prop("type", "type", ColumnKind::CustomerType),
        ],
        relations: &[has_many("Diet", "customer_id")],
    },
    ModelDefinition {
        name: "Food",
        table: "foods",
        id_kind: IdKind::Serial,
        properties: &[
            prop("description", "description", ColumnKind::Text),
            NUTRIENTS[0],
            NUTRIENTS[1],
            NUTRIENTS[2],
            NUTRIENTS[3],
        ],
        relations: &[],
    },
    ModelDefinition {
        name: "BodyArea",
        table: "body_areas",
        id_kind: IdKind::Serial,
        properties: &[prop("description", "description", ColumnKind::Text)],
        relations: &[has_many("BodyAreaExerciseDetail", "body_area_id")],
    },
    ModelDefinition {
        name: "Diet",
        table: "diets",
        id_kind: IdKind::Serial,
        properties: &[prop("description", "description", ColumnKind::Text)],
        relations: &[
            belongs_to("Customer", "customer_id"),
            has_many("DietFoodDetail", "diet_id"),
        ],
    },
    ModelDefinition {
        name: "DietFoodDetail",
        table: "diet_food_details",
        id_kind: IdKind::Serial,
        properties: &[
            prop("desiredGrams", "desired_grams", ColumnKind::Decimal),
            NUTRIENTS[0],
            NUTRIENTS[1],
            NUTRIENTS[2],
            NUTRIENTS[3],
        ],
        relations: &[belongs_to("Diet", "diet_id"), belongs_to("Food", "food_id")],
    },
    ModelDefinition {
        name: "Exercise",
        table: "exercises",
        id_kind: IdKind::Serial,
        properties: &[
            prop("name", "name", ColumnKind::Text),
            prop("imageName", "image_name", ColumnKind::Text),
        ],
        relations: &[
            has_many("BodyAreaExerciseDetail", "exercise_id"),
            has_many("ExerciseRoutineDetail", "exercise_id"),
        ],
    },
    ModelDefinition {
        name: "BodyAreaExerciseDetail",
        table: "body_area_exercise_details",
        id_kind: IdKind::Serial,
        properties: &[],
        relations: &[
            belongs_to("BodyArea", "body_area_id"),
            belongs_to("Exercise", "exercise_id"),
        ],
    },
    ModelDefinition {
        name: "Routine",
        table: "routines",
        id_kind: IdKind::Serial,
        properties: &[prop("description", "description", ColumnKind::Text)],
        relations: &[has_many("ExerciseRoutineDetail", "routine_id")],
    },
    ModelDefinition {
        name: "ExerciseRoutineDetail",
        table: "exercise_routine_details",
        id_kind: IdKind::Serial,
        properties: &[
            prop("series", "series", ColumnKind::Integer),
            prop("repetitions", "repetitions", ColumnKind::Integer),
        ],
        relations: &[
            belongs_to("Routine", "routine_id"),
            belongs_to("Exercise", "exercise_id"),
        ],
    },
];

/// Look a model up by name, ignoring case
pub fn find_model(name: &str) -> Option<&'static ModelDefinition> {
    MODELS.iter().find(|m| m.name.eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case("Routine", SeedKind::Complex)]
    #[case("Food", SeedKind::Simple)]
    #[case("Administrator", SeedKind::Simple)]
    #[case("DietFoodDetail", SeedKind::Complex)]
    fn test_seed_kind(#[case] name: &str, #[case] expected: SeedKind) {
        assert_eq!(find_model(name).unwrap().seed_kind(), expected);
    }

    #[test]
    fn test_find_model_ignores_case() {
        assert_eq!(find_model("dietfooddetail").unwrap().name, "DietFoodDetail");
        assert!(find_model("Workout").is_none());
    }

    #[test]
    fn test_every_relation_points_at_a_registered_model() {
        for model in MODELS {
            for relation in model.relations {
                assert!(
                    find_model(relation.model).is_some(),
                    "{} -> {}",
                    model.name,
                    relation.model
                );
            }
        }
    }

    #[test]
    fn test_has_many_is_mirrored_by_belongs_to() {
        for model in MODELS {
            for relation in model.has_many() {
                let child = find_model(relation.model).unwrap();
                assert!(
                    child
                        .belongs_to()
                        .any(|r| r.model == model.name && r.foreign_key == relation.foreign_key),
                    "{} hasMany {} has no matching belongsTo",
                    model.name,
                    child.name
                );
            }
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = MODELS.iter().map(|m| m.name.to_lowercase()).collect();
        assert_eq!(names.len(), MODELS.len());
    }
}
