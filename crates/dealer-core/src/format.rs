//! # Display Formatting
//!
//! Number and currency strings for totals panels and tables. Follows the
//! dealership's Vietnamese conventions by default (`1.234.567 ₫`); other
//! shapes are a [`CurrencyFormat`] away. No locale tables.

use serde::{Deserialize, Serialize};

use crate::rounding::round_to_decimal;
use crate::types::sanitize;

/// How a currency amount is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    /// Symbol placed before or after the number.
    pub symbol: String,

    /// True when the symbol follows the number (`100 ₫`).
    pub symbol_after: bool,

    /// Number of decimal places shown.
    pub decimals: u32,

    /// Thousands separator.
    pub thousands_separator: char,

    /// Decimal separator.
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    /// Vietnamese dong: no decimals, `.` grouping, trailing `₫`.
    fn default() -> Self {
        CurrencyFormat {
            symbol: "₫".to_string(),
            symbol_after: true,
            decimals: 0,
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }
}

impl CurrencyFormat {
    /// US-style dollars, handy for supplier quotes in USD.
    pub fn usd() -> Self {
        CurrencyFormat {
            symbol: "$".to_string(),
            symbol_after: false,
            decimals: 2,
            thousands_separator: ',',
            decimal_separator: '.',
        }
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

fn format_with(n: f64, decimals: u32, thousands: char, decimal: char) -> (bool, String) {
    let rounded = round_to_decimal(sanitize(n), decimals);
    let negative = rounded < 0.0;
    let text = format!("{:.*}", decimals as usize, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut out = group_thousands(int_part, thousands);
    if let Some(frac) = frac_part {
        out.push(decimal);
        out.push_str(frac);
    }
    (negative, out)
}

/// Formats `amount` as currency.
///
/// ## Example
/// ```rust
/// use dealer_core::format::{format_currency, CurrencyFormat};
///
/// assert_eq!(format_currency(45_500_000.0, &CurrencyFormat::default()), "45.500.000 ₫");
/// assert_eq!(format_currency(-1234.5, &CurrencyFormat::usd()), "-$1,234.50");
/// ```
pub fn format_currency(amount: f64, format: &CurrencyFormat) -> String {
    let (negative, number) = format_with(
        amount,
        format.decimals,
        format.thousands_separator,
        format.decimal_separator,
    );
    let sign = if negative { "-" } else { "" };

    if format.symbol_after {
        format!("{}{} {}", sign, number, format.symbol)
    } else {
        format!("{}{}{}", sign, format.symbol, number)
    }
}

/// Formats a plain number with `.` grouping and `,` decimals.
pub fn format_number(n: f64, decimals: u32) -> String {
    let (negative, number) = format_with(n, decimals, '.', ',');
    if negative {
        format!("-{}", number)
    } else {
        number
    }
}

/// Formats a percentage such as a margin or a period-over-period change.
pub fn format_percent(n: f64, decimals: u32) -> String {
    format!("{}%", format_number(n, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_vnd() {
        let vnd = CurrencyFormat::default();
        assert_eq!(format_currency(0.0, &vnd), "0 ₫");
        assert_eq!(format_currency(999.0, &vnd), "999 ₫");
        assert_eq!(format_currency(1_000.0, &vnd), "1.000 ₫");
        assert_eq!(format_currency(1_234_567.6, &vnd), "1.234.568 ₫");
        assert_eq!(format_currency(-50_000.0, &vnd), "-50.000 ₫");
    }

    #[test]
    fn test_format_currency_usd() {
        let usd = CurrencyFormat::usd();
        assert_eq!(format_currency(1234.5, &usd), "$1,234.50");
        assert_eq!(format_currency(0.0, &usd), "$0.00");
    }

    #[test]
    fn test_format_number_and_percent() {
        assert_eq!(format_number(1_234.567, 2), "1.234,57");
        assert_eq!(format_number(f64::NAN, 0), "0");
        assert_eq!(format_percent(12.345, 1), "12,3%");
        assert_eq!(format_percent(-20.0, 0), "-20%");
    }
}
