//! API request and response types
//!
//! JSON field names are camelCase to match the public HTTP contract
//! (`dietDetails`, `desiredGrams`, `bodyAreaId`, ...).

use crate::models::UserType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Accounts
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response, decorated with the account role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: AuthTokens,
    pub user_id: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
}

/// Customer sign-up request
///
/// Any `type` sent by the client is ignored; new customers are always REGULAR.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 80))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 80))]
    pub username: Option<String>,
    #[serde(default, rename = "type")]
    pub user_type: Option<UserType>,
}

/// Customer profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
}

/// Administrator profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministratorProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
}

/// Change a customer's subscription type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCustomerTypeRequest {
    #[serde(rename = "type")]
    pub user_type: UserType,
}

// ============================================================================
// Catalog
// ============================================================================

/// Food creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFoodRequest {
    #[validate(length(min = 1, max = 80))]
    pub description: String,
    pub proteins: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub calories: f64,
}

/// Food response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodResponse {
    pub id: i64,
    pub description: String,
    pub proteins: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub calories: f64,
}

/// Body area creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBodyAreaRequest {
    #[validate(length(min = 1, max = 80))]
    pub description: String,
}

/// Body area response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyAreaResponse {
    pub id: i64,
    pub description: String,
}

// ============================================================================
// Diets
// ============================================================================

/// Diet parent payload
///
/// `id` is required when editing and ignored on registration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DietInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 250))]
    pub description: String,
}

/// One food line of a diet with its nutrient snapshot
///
/// Amounts are stored as `NUMERIC(10, 2)`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DietFoodDetailInput {
    #[validate(range(min = 1))]
    pub food_id: i64,
    #[validate(range(min = 0.0, max = 99_999_999.99))]
    pub desired_grams: f64,
    #[validate(range(min = 0.0, max = 99_999_999.99))]
    pub proteins: f64,
    #[validate(range(min = 0.0, max = 99_999_999.99))]
    pub carbohydrates: f64,
    #[validate(range(min = 0.0, max = 99_999_999.99))]
    pub fats: f64,
    #[validate(range(min = 0.0, max = 99_999_999.99))]
    pub calories: f64,
}

/// Body of `fullDietRegistration` and `editDiet`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullDietRequest {
    pub diet: DietInput,
    pub diet_details: Vec<DietFoodDetailInput>,
}

/// Returned by diet registration and edit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietIdResponse {
    pub diet_id: i64,
}

/// Stored diet food line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietFoodDetailResponse {
    pub id: i64,
    pub food_id: i64,
    pub desired_grams: f64,
    pub proteins: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub calories: f64,
}

/// Diet with all of its food lines
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietResponse {
    pub id: i64,
    pub description: String,
    pub customer_id: String,
    pub diet_details: Vec<DietFoodDetailResponse>,
}

// ============================================================================
// Exercises
// ============================================================================

/// Exercise parent payload (multipart field `exercise`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInput {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
}

/// Body area link (multipart field `bodyAreaDetails`)
///
/// Clients may send whole body area objects, so `id` is accepted as an alias.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BodyAreaDetailInput {
    #[serde(alias = "id")]
    #[validate(range(min = 1))]
    pub body_area_id: i64,
}

/// Returned by exercise registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseIdResponse {
    pub exercise_id: i64,
}

/// Exercise with its body areas
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResponse {
    pub id: i64,
    pub name: String,
    pub image_name: String,
    pub body_area_ids: Vec<i64>,
}

// ============================================================================
// Routines
// ============================================================================

/// Routine parent payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoutineInput {
    #[validate(length(min = 1, max = 250))]
    pub description: String,
}

/// One exercise of a routine
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRoutineDetailInput {
    #[validate(range(min = 1))]
    pub exercise_id: i64,
    #[validate(range(min = 1, max = 100))]
    pub series: i32,
    #[validate(range(min = 1, max = 1000))]
    pub repetitions: i32,
}

/// Body of `fullRoutine`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullRoutineRequest {
    pub routine: RoutineInput,
    pub routine_details: Vec<ExerciseRoutineDetailInput>,
}

/// Returned by routine registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineIdResponse {
    pub routine_id: i64,
}

/// Stored routine exercise line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRoutineDetailResponse {
    pub id: i64,
    pub exercise_id: i64,
    pub series: i32,
    pub repetitions: i32,
}

/// Routine with all of its exercise lines
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineResponse {
    pub id: i64,
    pub description: String,
    pub routine_details: Vec<ExerciseRoutineDetailResponse>,
}
