//! Routine API routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::RoutineService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use diet_tracker_shared::types::{
    ExerciseRoutineDetailResponse, FullRoutineRequest, RoutineIdResponse, RoutineResponse,
};

/// Create routine routes
pub fn routine_routes() -> Router<AppState> {
    Router::new()
        .route("/fullRoutine", post(full_routine))
        .route("/:id", get(get_routine))
}

/// POST /api/Routines/fullRoutine - Create a routine with its exercises (ADMIN)
async fn full_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<FullRoutineRequest>,
) -> ApiResult<Json<RoutineIdResponse>> {
    auth.require_admin()?;
    let routine_id = RoutineService::full_registration(state.db(), req).await?;
    Ok(Json(RoutineIdResponse { routine_id }))
}

/// GET /api/Routines/:id - Routine with its exercises (ADMIN or PREMIUM)
async fn get_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<RoutineResponse>> {
    auth.require_admin_or_premium(state.db()).await?;
    let (routine, details) = RoutineService::get(state.db(), id).await?;

    Ok(Json(RoutineResponse {
        id: routine.id,
        description: routine.description,
        routine_details: details
            .into_iter()
            .map(|detail| ExerciseRoutineDetailResponse {
                id: detail.id,
                exercise_id: detail.exercise_id,
                series: detail.series,
                repetitions: detail.repetitions,
            })
            .collect(),
    }))
}
