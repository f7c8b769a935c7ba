//! # Validation Module
//!
//! Input validation for the order, invoice and partner forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form widgets                                                 │
//! │  ├── Required markers, input masks                                     │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before submit)                                  │
//! │  ├── Quantities, prices, rates, discounts                              │
//! │  └── Phone / e-mail / date formats                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: REST backend                                                 │
//! │  └── Authoritative checks                                              │
//! │                                                                         │
//! │  The calculation engine sits beside layer 2 and NEVER rejects input:   │
//! │  it degrades to 0. Anything financial is validated here first.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dealer_core::validation::{validate_quantity, validate_vat_rate};
//!
//! assert!(validate_quantity(2.0).is_ok());
//! assert!(validate_vat_rate(10.0).is_ok());
//! assert!(validate_vat_rate(120.0).is_err());
//! ```

use crate::dates::parse_date_utc;
use crate::error::ValidationError;
use crate::types::LineItem;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_KEY_LENGTH: usize = 100;

// =============================================================================
// Numeric Validators
// =============================================================================

fn ensure_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be a finite number
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(quantity: f64) -> ValidationResult<()> {
    ensure_finite("quantity", quantity)?;

    if quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1.0,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit, cost or sell price. Zero is allowed (gift items).
pub fn validate_price(field: &str, price: f64) -> ValidationResult<()> {
    ensure_finite(field, price)?;

    if price < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: f64::MAX,
        });
    }

    Ok(())
}

fn validate_percent(field: &str, rate: f64) -> ValidationResult<()> {
    ensure_finite(field, rate)?;

    if !(0.0..=100.0).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

/// Validates a VAT rate in percent (0–100).
pub fn validate_vat_rate(rate: f64) -> ValidationResult<()> {
    validate_percent("vat_rate", rate)
}

/// Validates a discount rate in percent (0–100).
pub fn validate_discount_rate(rate: f64) -> ValidationResult<()> {
    validate_percent("discount_rate", rate)
}

/// Validates a flat discount against the subtotal it applies to.
pub fn validate_discount_amount(discount: f64, subtotal: f64) -> ValidationResult<()> {
    validate_price("discount_amount", discount)?;

    if discount > subtotal {
        return Err(ValidationError::DiscountExceedsSubtotal { discount, subtotal });
    }

    Ok(())
}

/// Validates every line of an order or invoice before submission.
///
/// ## Rules
/// - At least one line
/// - Each quantity passes [`validate_quantity`]
/// - Each price passes [`validate_price`]
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "line items".to_string(),
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
        validate_price("unit_price", item.unit_price)?;
        if let Some(cost) = item.cost_price {
            validate_price("cost_price", cost)?;
        }
        if let Some(sell) = item.sell_price {
            validate_price("sell_price", sell)?;
        }
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a caller-chosen store key (form name, table id, cache key...).
///
/// ## Rules
/// - Must not be blank
/// - At most 100 characters
pub fn validate_key(field: &str, key: &str) -> ValidationResult<()> {
    let key = key.trim();

    if key.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if key.chars().count() > MAX_KEY_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_KEY_LENGTH,
        });
    }

    Ok(())
}

/// Validates a customer or supplier phone number.
///
/// ## Rules
/// - Optional leading `+`
/// - Spaces, dots and hyphens are ignored
/// - 9 to 15 digits remain
///
/// ## Example
/// ```rust
/// use dealer_core::validation::validate_phone;
///
/// assert!(validate_phone("0912 345 678").is_ok());
/// assert!(validate_phone("+84-912-345-678").is_ok());
/// assert!(validate_phone("12ab").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    let digits: String = body
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .collect();

    if !digits.chars().all(|c| c.is_ascii_digit()) || !(9..=15).contains(&digits.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain 9 to 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates an e-mail address (shape only: `local@domain.tld`).
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = domain
        .split_once('.')
        .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        .unwrap_or(false);

    if local.is_empty()
        || !domain_ok
        || email.contains(char::is_whitespace)
        || domain.contains('@')
    {
        return Err(invalid());
    }

    Ok(())
}

/// Validates an ISO 8601 date (due dates, transfer dates).
pub fn validate_date(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    parse_date_utc(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be an ISO 8601 date (YYYY-MM-DD)".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1.0).is_ok());
        assert!(validate_quantity(9_999.0).is_ok());

        assert!(validate_quantity(0.0).is_err());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(10_000.0).is_err());
        assert!(matches!(
            validate_quantity(f64::NAN),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("unit_price", 0.0).is_ok());
        assert!(validate_price("unit_price", 45_000_000.0).is_ok());
        assert!(validate_price("unit_price", -1.0).is_err());
        assert!(validate_price("unit_price", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_rates() {
        assert!(validate_vat_rate(0.0).is_ok());
        assert!(validate_vat_rate(10.0).is_ok());
        assert!(validate_vat_rate(100.0).is_ok());
        assert!(validate_vat_rate(100.5).is_err());
        assert!(validate_discount_rate(-5.0).is_err());
    }

    #[test]
    fn test_validate_discount_amount() {
        assert!(validate_discount_amount(5_000.0, 100_000.0).is_ok());
        assert!(matches!(
            validate_discount_amount(200_000.0, 100_000.0),
            Err(ValidationError::DiscountExceedsSubtotal { .. })
        ));
    }

    #[test]
    fn test_validate_line_items() {
        assert!(validate_line_items(&[]).is_err());
        assert!(validate_line_items(&[LineItem::new(1.0, 100.0)]).is_ok());
        assert!(validate_line_items(&[LineItem::new(1.0, 100.0).with_cost(-1.0)]).is_err());
        assert!(validate_line_items(&[LineItem::new(0.0, 100.0)]).is_err());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("form", "purchase-order").is_ok());
        assert!(validate_key("form", "   ").is_err());
        assert!(validate_key("form", &"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0912345678").is_ok());
        assert!(validate_phone("+84 912.345.678").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("09123abc78").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("sales@dealer.vn").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("@dealer.vn").is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("due_date", "2026-10-18").is_ok());
        assert!(validate_date("due_date", "").is_err());
        assert!(validate_date("due_date", "18/10/2026").is_err());
    }
}
