//! Sale-Checkout and the sales ledger.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pharmacy_core::{NewSale, Sale};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub medicine_id: Option<String>,
    pub quantity: Option<i64>,
}

/// `POST /api/sales`: sells at the medicine's current price, attributed to
/// the caller.
pub async fn create(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    JsonBody(body): JsonBody<CreateSaleRequest>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    let sale = NewSale::new(body.medicine_id, body.quantity)?;
    let recorded = state.db.sales().checkout(&sale, &auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<Sale>>> {
    Ok(Json(state.db.sales().list().await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Sale>> {
    Ok(Json(state.db.sales().get_by_id(&id).await?))
}
