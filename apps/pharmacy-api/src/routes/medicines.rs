//! Medicine catalogue CRUD.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use pharmacy_core::validation::{required, required_text, ValidationResult};
use pharmacy_core::{Medicine, MedicinePatch, Money, NewMedicine, Role};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMedicineRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    pub quantity: Option<i64>,
    pub expiry_date: Option<NaiveDate>,
    pub requires_prescription: Option<bool>,
}

impl CreateMedicineRequest {
    /// Opening stock defaults to zero.
    fn into_new_medicine(self) -> ValidationResult<NewMedicine> {
        let new = NewMedicine {
            name: required_text("name", self.name)?,
            description: self.description,
            manufacturer: self.manufacturer,
            category: self.category,
            price: Money::from_cents(required("price_cents", self.price_cents)?),
            quantity: self.quantity.unwrap_or(0),
            expiry_date: self.expiry_date,
            requires_prescription: self.requires_prescription.unwrap_or(false),
        };
        new.validate()?;
        Ok(new)
    }
}

/// `GET /api/medicines`
pub async fn list(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<Medicine>>> {
    Ok(Json(state.db.medicines().list().await?))
}

/// `POST /api/medicines`
pub async fn create(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    JsonBody(body): JsonBody<CreateMedicineRequest>,
) -> ApiResult<(StatusCode, Json<Medicine>)> {
    let new = body.into_new_medicine()?;
    let medicine = state.db.medicines().create(&new).await?;
    Ok((StatusCode::CREATED, Json(medicine)))
}

/// `GET /api/medicines/{id}`
pub async fn get(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Medicine>> {
    Ok(Json(state.db.medicines().get_by_id(&id).await?))
}

/// `PUT /api/medicines/{id}`: only the fields present in the body change.
pub async fn update(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<MedicinePatch>,
) -> ApiResult<Json<Medicine>> {
    Ok(Json(state.db.medicines().update(&id, &patch).await?))
}

/// `DELETE /api/medicines/{id}` (admin)
pub async fn delete(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth.require_role(Role::Admin)?;
    state.db.medicines().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmacy_core::ValidationError;

    fn request() -> CreateMedicineRequest {
        CreateMedicineRequest {
            name: Some("  Paracetamol ".to_string()),
            description: None,
            manufacturer: None,
            category: None,
            price_cents: Some(500),
            quantity: None,
            expiry_date: None,
            requires_prescription: None,
        }
    }

    #[test]
    fn test_defaults_applied() {
        let new = request().into_new_medicine().unwrap();
        assert_eq!(new.name, "Paracetamol");
        assert_eq!(new.quantity, 0);
        assert!(!new.requires_prescription);
    }

    #[test]
    fn test_price_required() {
        let err = CreateMedicineRequest {
            price_cents: None,
            ..request()
        }
        .into_new_medicine()
        .unwrap_err();

        assert!(matches!(err, ValidationError::Required { ref field } if field == "price_cents"));
    }

    #[test]
    fn test_negative_stock_rejected() {
        let result = CreateMedicineRequest {
            quantity: Some(-1),
            ..request()
        }
        .into_new_medicine();

        assert!(result.is_err());
    }
}
