//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::services::ImageStore;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// Every field is cheap to clone: the pool and the Prometheus handle are
/// reference counted, the JWT keys and config sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// JWT service with keys derived once at startup
    pub jwt: JwtService,
    /// Exercise image storage
    pub images: ImageStore,
    /// Prometheus exporter, absent when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig, metrics: Option<PrometheusHandle>) -> Self {
        let jwt = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
        );
        let images = ImageStore::from_config(&config.storage);

        Self {
            db,
            config: Arc::new(config),
            jwt,
            images,
            metrics,
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn images(&self) -> &ImageStore {
        &self.images
    }
}
