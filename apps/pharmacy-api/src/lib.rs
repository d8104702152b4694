//! # pharmacy-api: JSON REST server
//!
//! HTTP surface of the pharmacy backend. Handlers are thin: extract the
//! caller and the body, hand off to `pharmacy-db`, map the outcome.
//!
//! ## Request Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  request ──► CorsLayer ──► TraceLayer ──► Router                     │
//! │                                              │                       │
//! │                          AuthUser (Bearer JWT)  ──► 401 / 403         │
//! │                          JsonBody<T>            ──► 400               │
//! │                                              │                       │
//! │                              handler ──► Database repositories       │
//! │                                              │                       │
//! │                       ApiResult<T> ──► JSON body or {code, message}  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use pharmacy_db::Database;

pub use auth::{AuthUser, Claims, JwtManager};
pub use config::{ApiConfig, AppEnv, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared state handed to every handler.
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_expiration_secs);
        AppState { db, jwt, config }
    }
}

/// Builds the full application router over `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    routes::router(state)
}
