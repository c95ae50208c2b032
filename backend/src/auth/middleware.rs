//! Request authentication and role guards
//!
//! `AuthUser` is an extractor: handlers that take it reject unauthenticated
//! requests with 401 before any body parsing happens.

use crate::error::ApiError;
use crate::repositories::CustomerRepository;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use diet_tracker_shared::UserType;
use sqlx::PgPool;
use uuid::Uuid;

/// Authenticated account extracted from the access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub user_type: UserType,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    /// Only administrators may pass
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Administrator role required".to_string()))
        }
    }

    /// Only customer accounts (REGULAR or PREMIUM) may pass
    pub fn require_customer(&self) -> Result<(), ApiError> {
        if self.user_type.is_customer() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Customer account required".to_string()))
        }
    }

    /// Administrators, or customers whose stored type is currently PREMIUM
    ///
    /// The token role is not trusted for premium: a downgrade must take
    /// effect before the token expires.
    pub async fn require_admin_or_premium(&self, pool: &PgPool) -> Result<(), ApiError> {
        if self.is_admin() {
            return Ok(());
        }

        let current = CustomerRepository::find_type(pool, self.user_id)
            .await
            .map_err(ApiError::Internal)?;

        match current {
            Some(UserType::Premium) => Ok(()),
            _ => Err(ApiError::Forbidden("Premium subscription required".to_string())),
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = bearer_token(parts)?;

        let claims = app_state
            .jwt()
            .validate_access_token(token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

        let user_id = claims
            .user_id()
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        Ok(AuthUser {
            user_id,
            user_type: claims.role,
        })
    }
}
