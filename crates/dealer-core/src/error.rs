//! # Error Types
//!
//! Domain-specific error types for dealer-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  dealer-core errors (this file)                                        │
//! │  ├── CoreError        - Parsing of domain enums, wrapped validation    │
//! │  └── ValidationError  - Form input failures                            │
//! │                                                                         │
//! │  dealer-store errors (separate crate)                                  │
//! │  └── StoreError       - Storage medium failures (logged, not thrown)   │
//! │                                                                         │
//! │  The calculation engine itself has NO error type: it degrades to 0.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Aggregation period is not one of `day`, `month`, `year`.
    #[error("Unknown period: '{0}'. Valid options: day, month, year")]
    InvalidPeriod(String),

    /// Role name from a stored user profile is not recognised.
    #[error("Unknown role: '{0}'")]
    UnknownRole(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by [`crate::validation`] before a form is submitted. The
/// calculation engine never produces these.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a number")]
    NotANumber { field: String },

    /// Invalid format (e.g., invalid phone, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A discount that would make the total negative.
    #[error("discount {discount} exceeds subtotal {subtotal}")]
    DiscountExceedsSubtotal { discount: f64, subtotal: f64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer".to_string(),
        };
        assert_eq!(err.to_string(), "customer is required");

        let err = ValidationError::DiscountExceedsSubtotal {
            discount: 200.0,
            subtotal: 100.0,
        };
        assert_eq!(err.to_string(), "discount 200 exceeds subtotal 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_invalid_period_message() {
        let err = CoreError::InvalidPeriod("week".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown period: 'week'. Valid options: day, month, year"
        );
    }
}
