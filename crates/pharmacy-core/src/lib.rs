//! # pharmacy-core: Pure Domain Logic for the Pharmacy Backend
//!
//! Every rule that decides whether a purchase or a sale is acceptable lives
//! here, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pharmacy Backend Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 pharmacy-api (axum, JSON over HTTP)             │   │
//! │  │     /api/purchases   /api/sales   /api/medicines   /api/auth    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pharmacy-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │   patch   │  │   │
//! │  │   │ Medicine  │  │   Money   │  │ NewSale   │  │ Medicine  │  │   │
//! │  │   │ Purchase  │  │ checked × │  │NewPurchase│  │  Patch    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  pharmacy-db (Database Layer)                   │   │
//! │  │         SQLite queries, migrations, ledger transactions         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Rows (Medicine, Supplier, User, Purchase, Sale) and create payloads
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - Validated purchase/sale commands and line totals
//! - [`patch`] - Partial updates merged onto stored rows
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation
//!
//! ## Example Usage
//!
//! ```rust
//! use pharmacy_core::money::Money;
//! use pharmacy_core::ledger::line_total;
//!
//! // 5 units at $4.00
//! let total = line_total(Money::from_cents(400), 5).unwrap();
//! assert_eq!(total.cents(), 2000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod patch;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{NewPurchase, NewSale};
pub use money::Money;
pub use patch::{MedicinePatch, SupplierPatch};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity on a single purchase or sale line.
///
/// ## Business Reason
/// Catches typos like an extra zero on a wholesale order before they reach
/// the stock level.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Largest stock level a medicine may hold.
///
/// Bounds every write to `medicines.quantity`, so a purchase can never push
/// the column past the 64-bit integer range.
pub const MAX_STOCK_LEVEL: i64 = 1_000_000_000;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;
