//! # Patch Module
//!
//! Partial updates for medicines and suppliers.
//!
//! ## Merge Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PUT /api/medicines/{id}  { "price_cents": 650 }                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MedicinePatch { price_cents: Some(650), everything else: None }        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stored row ──► patch.apply_to(&mut row) ──► merged row                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  one static UPDATE writes every column of the merged row                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `None` means "leave as stored". A patch with no fields is rejected.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ValidationError;
use crate::types::{Medicine, Supplier};
use crate::validation::{
    validate_email, validate_name, validate_positive_cents, validate_stock_level,
    ValidationResult,
};

// =============================================================================
// Medicine Patch
// =============================================================================

/// Fields of a medicine that may be changed after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MedicinePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    /// Stock correction (stocktake). Purchases and sales move stock otherwise.
    pub quantity: Option<i64>,
    pub expiry_date: Option<NaiveDate>,
    pub requires_prescription: Option<bool>,
}

impl MedicinePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.manufacturer.is_none()
            && self.category.is_none()
            && self.price_cents.is_none()
            && self.quantity.is_none()
            && self.expiry_date.is_none()
            && self.requires_prescription.is_none()
    }

    /// Rejects empty patches and out-of-range values.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(price) = self.price_cents {
            validate_positive_cents("price_cents", price)?;
        }
        if let Some(quantity) = self.quantity {
            validate_stock_level(quantity)?;
        }
        Ok(())
    }

    /// Overwrites the fields present in the patch. Timestamps are left alone.
    pub fn apply_to(&self, medicine: &mut Medicine) {
        if let Some(name) = &self.name {
            medicine.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            medicine.description = Some(description.clone());
        }
        if let Some(manufacturer) = &self.manufacturer {
            medicine.manufacturer = Some(manufacturer.clone());
        }
        if let Some(category) = &self.category {
            medicine.category = Some(category.clone());
        }
        if let Some(price) = self.price_cents {
            medicine.price_cents = price;
        }
        if let Some(quantity) = self.quantity {
            medicine.quantity = quantity;
        }
        if let Some(expiry) = self.expiry_date {
            medicine.expiry_date = Some(expiry);
        }
        if let Some(requires_prescription) = self.requires_prescription {
            medicine.requires_prescription = requires_prescription;
        }
    }
}

// =============================================================================
// Supplier Patch
// =============================================================================

/// Fields of a supplier that may be changed after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl SupplierPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_person.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, supplier: &mut Supplier) {
        if let Some(name) = &self.name {
            supplier.name = name.trim().to_string();
        }
        if let Some(contact_person) = &self.contact_person {
            supplier.contact_person = Some(contact_person.clone());
        }
        if let Some(phone) = &self.phone {
            supplier.phone = Some(phone.clone());
        }
        if let Some(email) = &self.email {
            supplier.email = Some(email.clone());
        }
        if let Some(address) = &self.address {
            supplier.address = Some(address.clone());
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored_medicine() -> Medicine {
        Medicine {
            id: "m-1".to_string(),
            name: "Paracetamol 500mg".to_string(),
            description: Some("Pain relief".to_string()),
            manufacturer: Some("Acme Pharma".to_string()),
            category: Some("analgesic".to_string()),
            price_cents: 500,
            quantity: 10,
            expiry_date: None,
            requires_prescription: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        assert!(MedicinePatch::default().is_empty());
        assert_eq!(
            MedicinePatch::default().validate(),
            Err(ValidationError::EmptyPatch)
        );
        assert_eq!(
            SupplierPatch::default().validate(),
            Err(ValidationError::EmptyPatch)
        );
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut medicine = stored_medicine();
        let before = medicine.clone();

        let patch = MedicinePatch {
            price_cents: Some(650),
            requires_prescription: Some(true),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
        patch.apply_to(&mut medicine);

        assert_eq!(medicine.price_cents, 650);
        assert!(medicine.requires_prescription);
        assert_eq!(medicine.name, before.name);
        assert_eq!(medicine.quantity, before.quantity);
        assert_eq!(medicine.description, before.description);
        assert_eq!(medicine.updated_at, before.updated_at);
    }

    #[test]
    fn test_patch_values_are_validated() {
        let negative_stock = MedicinePatch {
            quantity: Some(-5),
            ..Default::default()
        };
        assert!(negative_stock.validate().is_err());

        let overstock = MedicinePatch {
            quantity: Some(crate::MAX_STOCK_LEVEL + 1),
            ..Default::default()
        };
        assert!(overstock.validate().is_err());

        let free = MedicinePatch {
            price_cents: Some(0),
            ..Default::default()
        };
        assert!(free.validate().is_err());

        let bad_email = SupplierPatch {
            email: Some("nobody".to_string()),
            ..Default::default()
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_patch_deserializes_missing_fields_as_none() {
        let patch: MedicinePatch = serde_json::from_str(r#"{"quantity": 0}"#).unwrap();
        assert_eq!(patch.quantity, Some(0));
        assert!(patch.name.is_none());

        let patch: SupplierPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_supplier_patch_apply() {
        let now = Utc::now();
        let mut supplier = Supplier {
            id: "s-1".to_string(),
            name: "MedSupply".to_string(),
            contact_person: None,
            phone: None,
            email: None,
            address: None,
            created_at: now,
            updated_at: now,
        };

        SupplierPatch {
            name: Some("  MedSupply Ltd ".to_string()),
            phone: Some("+1 555 0100".to_string()),
            ..Default::default()
        }
        .apply_to(&mut supplier);

        assert_eq!(supplier.name, "MedSupply Ltd");
        assert_eq!(supplier.phone.as_deref(), Some("+1 555 0100"));
        assert!(supplier.email.is_none());
    }
}
