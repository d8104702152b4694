//! HTTP routes.
//!
//! ```text
//! GET    /health
//! POST   /api/auth/register            public
//! POST   /api/auth/login               public
//! GET    /api/profile
//! GET    /api/medicines                POST   /api/medicines
//! GET    /api/medicines/{id}           PUT    /api/medicines/{id}
//! DELETE /api/medicines/{id}           admin
//! GET    /api/suppliers                POST   /api/suppliers
//! GET    /api/suppliers/{id}           PUT    /api/suppliers/{id}
//! DELETE /api/suppliers/{id}           admin
//! GET    /api/purchases                POST   /api/purchases
//! GET    /api/purchases/{id}
//! GET    /api/sales                    POST   /api/sales
//! GET    /api/sales/{id}
//! ```
//!
//! Everything under `/api` except `/api/auth/*` requires a bearer token; the
//! handlers enforce this by taking an [`AuthUser`](crate::auth::AuthUser).

pub mod auth;
pub mod health;
pub mod medicines;
pub mod purchases;
pub mod sales;
pub mod suppliers;

use std::sync::Arc;

use axum::http::Uri;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ErrorCode};
use crate::AppState;

/// Builds the application router with CORS and request tracing applied.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/profile", get(auth::profile))
        .route("/medicines", get(medicines::list).post(medicines::create))
        .route(
            "/medicines/{id}",
            get(medicines::get)
                .put(medicines::update)
                .delete(medicines::delete),
        )
        .route("/suppliers", get(suppliers::list).post(suppliers::create))
        .route(
            "/suppliers/{id}",
            get(suppliers::get)
                .put(suppliers::update)
                .delete(suppliers::delete),
        )
        .route("/purchases", get(purchases::list).post(purchases::create))
        .route("/purchases/{id}", get(purchases::get))
        .route("/sales", get(sales::list).post(sales::create))
        .route("/sales/{id}", get(sales::get));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

/// Any origin, method and header.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn fallback(uri: Uri) -> ApiError {
    ApiError::new(ErrorCode::NotFound, format!("No route for {}", uri.path()))
}
