//! Catalog routes - foods and body areas

use super::dec_to_f64;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::repositories::{BodyAreaRecord, FoodRecord};
use crate::services::CatalogService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use diet_tracker_shared::types::{
    BodyAreaResponse, CreateBodyAreaRequest, CreateFoodRequest, FoodResponse,
};

/// Create food routes
pub fn food_routes() -> Router<AppState> {
    Router::new().route("/", post(create_food).get(list_foods))
}

/// Create body area routes
pub fn body_area_routes() -> Router<AppState> {
    Router::new().route("/", post(create_body_area).get(list_body_areas))
}

fn food_response(food: FoodRecord) -> FoodResponse {
    FoodResponse {
        id: food.id,
        description: food.description,
        proteins: dec_to_f64(food.proteins),
        carbohydrates: dec_to_f64(food.carbohydrates),
        fats: dec_to_f64(food.fats),
        calories: dec_to_f64(food.calories),
    }
}

fn body_area_response(area: BodyAreaRecord) -> BodyAreaResponse {
    BodyAreaResponse {
        id: area.id,
        description: area.description,
    }
}

/// POST /api/Foods (ADMIN)
async fn create_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFoodRequest>,
) -> ApiResult<Json<FoodResponse>> {
    auth.require_admin()?;
    let food = CatalogService::create_food(state.db(), req).await?;
    Ok(Json(food_response(food)))
}

/// GET /api/Foods
async fn list_foods(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<FoodResponse>>> {
    let foods = CatalogService::list_foods(state.db()).await?;
    Ok(Json(foods.into_iter().map(food_response).collect()))
}

/// POST /api/BodyAreas (ADMIN)
async fn create_body_area(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBodyAreaRequest>,
) -> ApiResult<Json<BodyAreaResponse>> {
    auth.require_admin()?;
    let area = CatalogService::create_body_area(state.db(), req).await?;
    Ok(Json(body_area_response(area)))
}

/// GET /api/BodyAreas
async fn list_body_areas(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<BodyAreaResponse>>> {
    let areas = CatalogService::list_body_areas(state.db()).await?;
    Ok(Json(areas.into_iter().map(body_area_response).collect()))
}
