//! Route definitions for the Diet Tracker API
//!
//! Resource paths keep the public casing clients already use
//! (`/api/Diets`, `/api/Exercises`, ...).

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod accounts;
mod catalog;
mod diets;
mod exercises;
mod health;
mod metrics;
mod routines;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let max_image_bytes = state.config().storage.max_image_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::render_metrics))
        .nest("/api", api_routes(max_image_bytes))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/auth", accounts::auth_routes())
        .nest("/Customers", accounts::customer_routes())
        .nest("/Administrators", accounts::administrator_routes())
        .nest("/Foods", catalog::food_routes())
        .nest("/BodyAreas", catalog::body_area_routes())
        .nest("/Diets", diets::diet_routes())
        .nest("/Exercises", exercises::exercise_routes(max_image_bytes))
        .nest("/Routines", routines::routine_routes())
}

/// NUMERIC column to JSON number
pub(crate) fn dec_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}
