//! # Ledger Module
//!
//! Validated commands for the two stock-moving operations and the line-total
//! arithmetic they share.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  JSON body (all fields optional on the wire)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NewPurchase::new / NewSale::new   ← THIS MODULE                        │
//! │  ├── every field present?                                               │
//! │  ├── ids are UUIDs?                                                     │
//! │  └── quantity, unit price > 0?                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pharmacy-db transaction                                                │
//! │  ├── purchase: +quantity, insert line (total = line_total(..))          │
//! │  └── sale: conditional −quantity, insert line at price snapshot         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A command that exists has already passed validation, so the database
//! layer never re-checks field shapes.

use serde::Serialize;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    required, validate_positive_cents, validate_quantity, validate_uuid, ValidationResult,
};

/// Computes `unit_price × quantity` for a ledger line.
///
/// ## Errors
/// `ValidationError::TotalOverflow` when the product leaves the i64 range.
///
/// ## Example
/// ```rust
/// use pharmacy_core::ledger::line_total;
/// use pharmacy_core::Money;
///
/// assert_eq!(line_total(Money::from_cents(500), 3).unwrap().cents(), 1500);
/// assert!(line_total(Money::from_cents(i64::MAX), 2).is_err());
/// ```
pub fn line_total(unit_price: Money, quantity: i64) -> ValidationResult<Money> {
    unit_price
        .checked_mul_quantity(quantity)
        .ok_or(ValidationError::TotalOverflow {
            quantity,
            unit_price_cents: unit_price.cents(),
        })
}

// =============================================================================
// Purchase-Intake Command
// =============================================================================

/// A purchase that is ready to be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPurchase {
    medicine_id: String,
    supplier_id: String,
    quantity: i64,
    unit_price: Money,
    total: Money,
}

impl NewPurchase {
    /// Validates raw request fields and computes the line total.
    ///
    /// ## Arguments
    /// * `medicine_id` - Medicine receiving stock
    /// * `supplier_id` - Supplier the stock came from
    /// * `quantity` - Units received, > 0
    /// * `unit_price_cents` - Price paid per unit, > 0
    pub fn new(
        medicine_id: Option<String>,
        supplier_id: Option<String>,
        quantity: Option<i64>,
        unit_price_cents: Option<i64>,
    ) -> ValidationResult<Self> {
        let medicine_id = required("medicine_id", medicine_id)?;
        let supplier_id = required("supplier_id", supplier_id)?;
        let quantity = required("quantity", quantity)?;
        let unit_price_cents = required("unit_price_cents", unit_price_cents)?;

        validate_uuid("medicine_id", &medicine_id)?;
        validate_uuid("supplier_id", &supplier_id)?;
        validate_quantity(quantity)?;
        validate_positive_cents("unit_price_cents", unit_price_cents)?;

        let unit_price = Money::from_cents(unit_price_cents);
        let total = line_total(unit_price, quantity)?;

        Ok(NewPurchase {
            medicine_id,
            supplier_id,
            quantity,
            unit_price,
            total,
        })
    }

    pub fn medicine_id(&self) -> &str {
        &self.medicine_id
    }

    pub fn supplier_id(&self) -> &str {
        &self.supplier_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn total(&self) -> Money {
        self.total
    }
}

// =============================================================================
// Sale-Checkout Command
// =============================================================================

/// A sale that is ready to be checked out.
///
/// The unit price is not part of the command: it is read from the medicine
/// inside the checkout transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSale {
    medicine_id: String,
    quantity: i64,
}

impl NewSale {
    pub fn new(medicine_id: Option<String>, quantity: Option<i64>) -> ValidationResult<Self> {
        let medicine_id = required("medicine_id", medicine_id)?;
        let quantity = required("quantity", quantity)?;

        validate_uuid("medicine_id", &medicine_id)?;
        validate_quantity(quantity)?;

        Ok(NewSale {
            medicine_id,
            quantity,
        })
    }

    pub fn medicine_id(&self) -> &str {
        &self.medicine_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Total for this sale at the given price snapshot.
    pub fn total_at(&self, unit_price: Money) -> ValidationResult<Money> {
        line_total(unit_price, self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MED: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";
    const SUP: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

    #[test]
    fn test_purchase_computes_total() {
        let purchase = NewPurchase::new(
            Some(MED.to_string()),
            Some(SUP.to_string()),
            Some(5),
            Some(400),
        )
        .unwrap();

        assert_eq!(purchase.quantity(), 5);
        assert_eq!(purchase.unit_price(), Money::from_cents(400));
        assert_eq!(purchase.total(), Money::from_cents(2000));
        assert_eq!(purchase.medicine_id(), MED);
        assert_eq!(purchase.supplier_id(), SUP);
    }

    #[test]
    fn test_purchase_reports_first_missing_field() {
        let err = NewPurchase::new(Some(MED.to_string()), None, Some(5), Some(400)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "supplier_id".to_string()
            }
        );

        let err = NewPurchase::new(Some(MED.to_string()), Some(SUP.to_string()), Some(5), None)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "unit_price_cents".to_string()
            }
        );
    }

    #[test]
    fn test_purchase_rejects_non_positive_values() {
        let zero_qty =
            NewPurchase::new(Some(MED.to_string()), Some(SUP.to_string()), Some(0), Some(400));
        assert!(matches!(zero_qty, Err(ValidationError::MustBePositive { .. })));

        let negative_price =
            NewPurchase::new(Some(MED.to_string()), Some(SUP.to_string()), Some(3), Some(-1));
        assert!(matches!(
            negative_price,
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_purchase_rejects_malformed_ids() {
        let err = NewPurchase::new(
            Some("not-a-uuid".to_string()),
            Some(SUP.to_string()),
            Some(1),
            Some(1),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "medicine_id"));
    }

    #[test]
    fn test_purchase_total_overflow_is_validation_error() {
        let err = NewPurchase::new(
            Some(MED.to_string()),
            Some(SUP.to_string()),
            Some(1_000),
            Some(i64::MAX / 10),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::TotalOverflow { .. }));
    }

    #[test]
    fn test_sale_command() {
        let sale = NewSale::new(Some(MED.to_string()), Some(3)).unwrap();
        assert_eq!(sale.quantity(), 3);
        assert_eq!(
            sale.total_at(Money::from_cents(500)).unwrap(),
            Money::from_cents(1500)
        );

        assert!(NewSale::new(None, Some(3)).is_err());
        assert!(NewSale::new(Some(MED.to_string()), None).is_err());
        assert!(NewSale::new(Some(MED.to_string()), Some(-2)).is_err());
    }
}
