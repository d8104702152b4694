//! # Validation Module
//!
//! Field-level validation for everything that arrives over HTTP.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: axum extractor                                               │
//! │  └── JSON shape (syntax, field types)                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── presence (`required`)                                             │
//! │  ├── positivity of quantities and prices                               │
//! │  └── id / email / username formats                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity BETWEEN 0 AND 1000000000)                         │
//! │  ├── UNIQUE (username, email)                                          │
//! │  └── FOREIGN KEY ... ON DELETE RESTRICT                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pharmacy_core::validation::{required, validate_quantity};
//!
//! let qty = required("quantity", Some(5)).unwrap();
//! validate_quantity(qty).unwrap();
//!
//! assert!(required::<i64>("quantity", None).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_LINE_QUANTITY, MAX_STOCK_LEVEL, MIN_PASSWORD_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest name accepted for medicines and suppliers.
pub const MAX_NAME_LENGTH: usize = 200;

// =============================================================================
// Presence
// =============================================================================

/// Unwraps a field that must be present in the request body.
pub fn required<T>(field: &str, value: Option<T>) -> ValidationResult<T> {
    value.ok_or_else(|| ValidationError::Required {
        field: field.to_string(),
    })
}

/// Unwraps a text field that must be present and non-blank. Returns it trimmed.
pub fn required_text(field: &str, value: Option<String>) -> ValidationResult<String> {
    let value = required(field, value)?;
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(trimmed.to_string())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a medicine or supplier name.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_NAME_LENGTH`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a login name.
///
/// ## Rules
/// - 3 to 50 characters
/// - ASCII letters, digits, `_`, `-`, `.`
///
/// ## Example
/// ```rust
/// use pharmacy_core::validation::validate_username;
///
/// assert!(validate_username("pharmacist_01").is_ok());
/// assert!(validate_username("ab").is_err());
/// assert!(validate_username("has space").is_err());
/// ```
pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.len() < 3 {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: 3,
        });
    }

    if username.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "only letters, digits, '_', '-' and '.' are allowed".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Only checks the shape `local@domain.tld`; deliverability is not our concern.
pub fn validate_email(field: &str, email: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid email address".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;

    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a plaintext password before hashing.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a purchase or sale line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_LINE_QUANTITY`]
///
/// ## Example
/// ```rust
/// use pharmacy_core::validation::validate_quantity;
///
/// assert!(validate_quantity(5).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-3).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock level set directly on a medicine (create or patch).
///
/// ## Rules
/// - Zero is allowed (out of stock)
/// - Negative stock is never allowed
/// - At most [`MAX_STOCK_LEVEL`]
pub fn validate_stock_level(qty: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK_LEVEL).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_STOCK_LEVEL,
        });
    }

    Ok(())
}

/// Validates a strictly positive amount of cents.
///
/// Used for `unit_price_cents` on purchases and `price_cents` on medicines.
pub fn validate_positive_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use pharmacy_core::validation::validate_uuid;
///
/// assert!(validate_uuid("medicine_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("medicine_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
