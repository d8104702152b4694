//! Supplier CRUD.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pharmacy_core::validation::required_text;
use pharmacy_core::{NewSupplier, Role, Supplier, SupplierPatch};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSupplierRequest {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<Supplier>>> {
    Ok(Json(state.db.suppliers().list().await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    JsonBody(body): JsonBody<CreateSupplierRequest>,
) -> ApiResult<(StatusCode, Json<Supplier>)> {
    let new = NewSupplier {
        name: required_text("name", body.name)?,
        contact_person: body.contact_person,
        phone: body.phone,
        email: body.email,
        address: body.address,
    };

    let supplier = state.db.suppliers().create(&new).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Supplier>> {
    Ok(Json(state.db.suppliers().get_by_id(&id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<SupplierPatch>,
) -> ApiResult<Json<Supplier>> {
    Ok(Json(state.db.suppliers().update(&id, &patch).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth.require_role(Role::Admin)?;
    state.db.suppliers().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
