//! # Domain Types
//!
//! Rows and create payloads used throughout the pharmacy backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Medicine     │   │    Supplier     │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  price_cents    │   │  name           │   │  username       │       │
//! │  │  quantity ≥ 0   │   │  contact info   │   │  role           │       │
//! │  └────────┬────────┘   └────────┬────────┘   └────────┬────────┘       │
//! │           │                     │                     │                 │
//! │           ├──────────┬──────────┘                     │                 │
//! │           │          ▼                                │                 │
//! │           │  ┌─────────────────┐   ┌─────────────────┐│                 │
//! │           │  │    Purchase     │   │      Sale       ││                 │
//! │           │  │  (ledger line)  │   │  (ledger line)  │◄┘                │
//! │           └─►│  +quantity      │   │  −quantity      │◄── Medicine      │
//! │              └─────────────────┘   └─────────────────┘                  │
//! │                                                                         │
//! │  Ledger lines are immutable: written once, never updated or deleted.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_email, validate_name, validate_positive_cents, validate_stock_level,
    ValidationResult,
};

// =============================================================================
// Role
// =============================================================================

/// Authorization role carried by every user and every access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular staff: stock, purchases, sales.
    #[default]
    User,
    /// Can additionally delete medicines and suppliers.
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["user".to_string(), "admin".to_string()],
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Medicine
// =============================================================================

/// A stocked medicine.
///
/// `quantity` only moves through purchases (+) and sales (−), or through an
/// explicit stock correction in a patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Medicine {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub category: Option<String>,
    /// Current selling price in cents. Copied onto every sale line.
    pub price_cents: i64,
    /// Units on the shelf. Never negative.
    pub quantity: i64,
    pub expiry_date: Option<NaiveDate>,
    pub requires_prescription: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    /// Returns the selling price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Payload for creating a medicine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedicine {
    pub name: String,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub category: Option<String>,
    pub price: Money,
    pub quantity: i64,
    pub expiry_date: Option<NaiveDate>,
    pub requires_prescription: bool,
}

impl NewMedicine {
    /// Checks name, price (> 0) and opening stock (>= 0).
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_positive_cents("price_cents", self.price.cents())?;
        validate_stock_level(self.quantity)?;
        Ok(())
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A wholesaler that purchases are booked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewSupplier {
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl NewSupplier {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        Ok(())
    }
}

// =============================================================================
// Ledger Lines
// =============================================================================

/// Stock received from a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: String,
    pub medicine_id: String,
    pub supplier_id: String,
    pub quantity: i64,
    /// Price paid per unit, in cents.
    pub unit_price_cents: i64,
    /// `quantity × unit_price_cents`, fixed at write time.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// Stock sold over the counter by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub medicine_id: String,
    /// The authenticated user who rang up the sale.
    pub user_id: String,
    pub quantity: i64,
    /// Medicine price at the moment of sale (snapshot).
    pub unit_price_cents: i64,
    /// `quantity × unit_price_cents`, fixed at write time.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
