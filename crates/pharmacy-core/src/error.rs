//! # Error Types
//!
//! Domain-specific error types for pharmacy-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pharmacy-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pharmacy-db errors (separate crate)                                   │
//! │  └── DbError          - Database failures, wraps CoreError             │
//! │                                                                         │
//! │  pharmacy-api errors (in app)                                          │
//! │  └── ApiError         - What HTTP clients see ({code, message})        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the ledger operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Medicine id does not exist.
    #[error("Medicine not found: {0}")]
    MedicineNotFound(String),

    /// Supplier id does not exist.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// A sale asked for more units than are on the shelf.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /api/sales { quantity: 20 }
    ///      │
    ///      ▼
    /// Conditional decrement matches no row, stock is 12
    ///      │
    ///      ▼
    /// InsufficientStock { medicine_id, available: 12, requested: 20 }
    ///      │
    ///      ▼
    /// 400 INSUFFICIENT_STOCK, nothing written
    /// ```
    #[error("Insufficient stock for medicine {medicine_id}: available {available}, requested {requested}")]
    InsufficientStock {
        medicine_id: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any persistence work starts, so they never leave side effects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// quantity × unit price does not fit in the money range.
    #[error("total for {quantity} × {unit_price_cents} cents overflows")]
    TotalOverflow { quantity: i64, unit_price_cents: i64 },

    /// A purchase would lift stock past the per-medicine ceiling.
    #[error("stock of {current} plus {adding} exceeds the limit of {max}")]
    StockLimitExceeded { current: i64, adding: i64, max: i64 },

    /// A patch carried no fields at all.
    #[error("no fields to update")]
    EmptyPatch,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
