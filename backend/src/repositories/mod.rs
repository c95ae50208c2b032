//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod administrator;
pub mod catalog;
pub mod customer;
pub mod diet;
pub mod exercise;
pub mod routine;

pub use administrator::{AdministratorRecord, AdministratorRepository, NewAdministrator};
pub use catalog::{BodyAreaRecord, BodyAreaRepository, FoodRecord, FoodRepository, NewFood};
pub use customer::{CustomerRecord, CustomerRepository, NewCustomer};
pub use diet::{DietFoodDetailRecord, DietRecord, DietRepository, NewDiet, NewDietFoodDetail};
pub use exercise::{ExerciseRecord, ExerciseRepository, NewExercise};
pub use routine::{
    ExerciseRoutineDetailRecord, NewExerciseRoutineDetail, RoutineRecord, RoutineRepository,
};

/// Bind parameters allowed in one statement, under Postgres's limit of 65535
pub const MAX_BINDS: usize = 60_000;

/// Rows that fit in one multi-row `INSERT` binding `columns` values per row
pub fn rows_per_statement(columns: usize) -> usize {
    (MAX_BINDS / columns.max(1)).max(1)
}
