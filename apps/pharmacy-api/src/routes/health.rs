//! Liveness and readiness probe.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pharmacy_db::migrations::migration_status;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub migrations: MigrationInfo,
}

#[derive(Debug, Serialize)]
pub struct MigrationInfo {
    pub applied: usize,
    pub total: usize,
}

/// `GET /health`. Answers 503 with `"status": "degraded"` when the database
/// does not respond.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let (total, applied) = migration_status(state.db.pool()).await.unwrap_or((0, 0));

    let (code, status) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            migrations: MigrationInfo { applied, total },
        }),
    )
}
