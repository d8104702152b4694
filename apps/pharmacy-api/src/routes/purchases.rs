//! Purchase-Intake and the purchase ledger.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pharmacy_core::{NewPurchase, Purchase};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::AppState;

/// Body of `POST /api/purchases`. Every field is required; absence is
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequest {
    pub medicine_id: Option<String>,
    pub supplier_id: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price_cents: Option<i64>,
}

/// `POST /api/purchases`: books received stock and raises the shelf count.
pub async fn create(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    JsonBody(body): JsonBody<CreatePurchaseRequest>,
) -> ApiResult<(StatusCode, Json<Purchase>)> {
    let purchase = NewPurchase::new(
        body.medicine_id,
        body.supplier_id,
        body.quantity,
        body.unit_price_cents,
    )?;

    let recorded = state.db.purchases().record(&purchase).await?;

    info!(
        purchase_id = %recorded.id,
        user = %auth.username,
        total = %recorded.total(),
        "Purchase booked"
    );
    Ok((StatusCode::CREATED, Json(recorded)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<Purchase>>> {
    Ok(Json(state.db.purchases().list().await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Purchase>> {
    Ok(Json(state.db.purchases().get_by_id(&id).await?))
}
