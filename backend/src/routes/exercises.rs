//! Exercise API routes
//!
//! `fullExerciseRegistration` is a multipart request with three fields:
//! `exercise` (JSON), `bodyAreaDetails` (JSON array) and `fileImage` (binary).

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, UploadError};
use crate::services::{ExerciseService, ExerciseUpload, UploadedImage};
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use diet_tracker_shared::types::{
    BodyAreaDetailInput, ExerciseIdResponse, ExerciseInput, ExerciseResponse,
};
use serde::de::DeserializeOwned;

/// Extra room for the JSON fields and multipart framing
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create exercise routes
pub fn exercise_routes(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/fullExerciseRegistration",
            post(full_exercise_registration)
                .layer(DefaultBodyLimit::max(max_image_bytes + MULTIPART_OVERHEAD_BYTES)),
        )
        .route("/:id", get(get_exercise))
}

/// POST /api/Exercises/fullExerciseRegistration - Create an exercise with
/// its body areas and image (ADMIN)
async fn full_exercise_registration(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<ExerciseIdResponse>> {
    auth.require_admin()?;

    let max_image_bytes = state.config().storage.max_image_bytes;
    let upload = read_exercise_upload(multipart, max_image_bytes).await?;
    let exercise_id = ExerciseService::full_registration(state.db(), state.images(), upload).await?;

    Ok(Json(ExerciseIdResponse { exercise_id }))
}

/// GET /api/Exercises/:id - Exercise with its body area ids
async fn get_exercise(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ExerciseResponse>> {
    let (exercise, body_area_ids) = ExerciseService::get(state.db(), id).await?;

    Ok(Json(ExerciseResponse {
        id: exercise.id,
        name: exercise.name,
        image_name: exercise.image_name,
        body_area_ids,
    }))
}

fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::Upload(UploadError::TooLarge { limit })
    } else {
        ApiError::BadRequest(format!("Malformed multipart body: {}", err.body_text()))
    }
}

fn parse_json_field<T: DeserializeOwned>(name: &str, raw: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(raw)
        .map_err(|e| ApiError::BadRequest(format!("Field `{}` is not valid JSON: {}", name, e)))
}

async fn read_exercise_upload(
    mut multipart: Multipart,
    max_image_bytes: usize,
) -> Result<ExerciseUpload, ApiError> {
    let map_multipart = |err| multipart_error(err, max_image_bytes);
    let mut exercise: Option<ExerciseInput> = None;
    let mut body_area_details: Option<Vec<BodyAreaDetailInput>> = None;
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(map_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "exercise" => {
                let raw = field.bytes().await.map_err(map_multipart)?;
                exercise = Some(parse_json_field(&name, &raw)?);
            }
            "bodyAreaDetails" => {
                let raw = field.bytes().await.map_err(map_multipart)?;
                body_area_details = Some(parse_json_field(&name, &raw)?);
            }
            "fileImage" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(map_multipart)?;
                image = Some(UploadedImage {
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(ExerciseUpload {
        exercise: exercise
            .ok_or_else(|| ApiError::BadRequest("Missing field `exercise`".to_string()))?,
        body_area_details: body_area_details
            .ok_or_else(|| ApiError::BadRequest("Missing field `bodyAreaDetails`".to_string()))?,
        image: image.ok_or_else(|| UploadError::Missing("fileImage".to_string()))?,
    })
}
