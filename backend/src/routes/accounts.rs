//! Account routes - customers, administrators and token refresh

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::account::refresh_tokens;
use crate::services::{AdministratorService, CustomerService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use diet_tracker_shared::types::{
    AdministratorProfile, CreateCustomerRequest, CustomerProfile, LoginRequest, LoginResponse,
    UpdateCustomerTypeRequest,
};
use serde::Deserialize;
use uuid::Uuid;

/// Create customer routes
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(sign_up))
        .route("/login", post(customer_login))
        .route("/:id/type", put(update_customer_type))
}

/// Create administrator routes
pub fn administrator_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(administrator_login))
        .route("/:id", get(get_administrator))
}

/// Create token routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/refresh", post(refresh))
}

/// POST /api/Customers - Customer sign-up, always REGULAR
async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<CreateCustomerRequest>,
) -> ApiResult<Json<CustomerProfile>> {
    let profile = CustomerService::sign_up(state.db(), req).await?;
    Ok(Json(profile))
}

/// POST /api/Customers/login - Tokens plus the customer's type
async fn customer_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = CustomerService::login(state.db(), state.jwt(), &req.email, &req.password).await?;
    Ok(Json(response))
}

/// PUT /api/Customers/:id/type - Upgrade or downgrade a customer (ADMIN)
async fn update_customer_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCustomerTypeRequest>,
) -> ApiResult<Json<CustomerProfile>> {
    auth.require_admin()?;
    let profile = CustomerService::update_type(state.db(), id, req.user_type).await?;
    Ok(Json(profile))
}

/// POST /api/Administrators/login - Tokens stamped ADMIN
async fn administrator_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response =
        AdministratorService::login(state.db(), state.jwt(), &req.email, &req.password).await?;
    Ok(Json(response))
}

/// GET /api/Administrators/:id (ADMIN)
async fn get_administrator(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AdministratorProfile>> {
    auth.require_admin()?;
    let profile = AdministratorService::get(state.db(), id).await?;
    Ok(Json(profile))
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// POST /api/auth/refresh
async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = refresh_tokens(state.db(), state.jwt(), &req.refresh_token).await?;
    Ok(Json(response))
}
