//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and external systems.

pub mod account;
pub mod aggregate;
pub mod catalog;
pub mod diet;
pub mod exercise;
pub mod routine;
pub mod upload;

pub use account::{AdministratorService, CustomerService};
pub use aggregate::{persist_aggregate, Aggregate};
pub use catalog::CatalogService;
pub use diet::DietService;
pub use exercise::{ExerciseService, ExerciseUpload};
pub use routine::RoutineService;
pub use upload::{ImageStore, UploadedImage};

use crate::error::ApiError;
use diet_tracker_shared::validation::MAX_AMOUNT;
use rust_decimal::{Decimal, RoundingStrategy};

/// Convert an API number into a `NUMERIC(10, 2)` column value, rounded to cents
pub(crate) fn to_decimal(field: &str, value: f64) -> Result<Decimal, ApiError> {
    if !value.is_finite() || value.abs() > MAX_AMOUNT {
        return Err(ApiError::Validation(format!(
            "{} must be a number no larger than {}",
            field, MAX_AMOUNT
        )));
    }
    let decimal = Decimal::try_from(value)
        .map_err(|_| ApiError::Validation(format!("{} must be a finite number", field)))?;
    Ok(decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
