//! Diet API routes

use super::dec_to_f64;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::DietService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use diet_tracker_shared::types::{
    DietFoodDetailResponse, DietIdResponse, DietResponse, FullDietRequest,
};

/// Create diet routes
pub fn diet_routes() -> Router<AppState> {
    Router::new()
        .route("/fullDietRegistration", post(full_diet_registration))
        .route("/editDiet", put(edit_diet))
        .route("/:id", get(get_diet))
}

/// POST /api/Diets/fullDietRegistration - Create a diet with its food lines
///
/// The diet owner is the calling customer, whatever the body says.
async fn full_diet_registration(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<FullDietRequest>,
) -> ApiResult<Json<DietIdResponse>> {
    auth.require_customer()?;
    let diet_id = DietService::full_registration(state.db(), auth.user_id, req).await?;
    Ok(Json(DietIdResponse { diet_id }))
}

/// PUT /api/Diets/editDiet - Replace a diet and its food lines (owner only)
async fn edit_diet(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<FullDietRequest>,
) -> ApiResult<Json<DietIdResponse>> {
    auth.require_customer()?;
    let diet_id = DietService::edit(state.db(), auth.user_id, req).await?;
    Ok(Json(DietIdResponse { diet_id }))
}

/// GET /api/Diets/:id - Diet with its food lines (owner only)
async fn get_diet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<DietResponse>> {
    let (diet, details) = DietService::get(state.db(), auth.user_id, id).await?;

    Ok(Json(DietResponse {
        id: diet.id,
        description: diet.description,
        customer_id: diet.customer_id.to_string(),
        diet_details: details
            .into_iter()
            .map(|detail| DietFoodDetailResponse {
                id: detail.id,
                food_id: detail.food_id,
                desired_grams: dec_to_f64(detail.desired_grams),
                proteins: dec_to_f64(detail.proteins),
                carbohydrates: dec_to_f64(detail.carbohydrates),
                fats: dec_to_f64(detail.fats),
                calories: dec_to_f64(detail.calories),
            })
            .collect(),
    }))
}
