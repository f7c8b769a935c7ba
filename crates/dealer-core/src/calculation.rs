//! # Calculation Module
//!
//! Totals, VAT, discount, profit and stock arithmetic for the order,
//! invoice and inventory pages.
//!
//! ## Never Crash a Total Display
//! Every function here is total: zero, NaN and infinite inputs count as
//! "not given" and the result degrades to a defined value (usually 0).
//! Callers that submit financial data validate first with
//! [`crate::validation`].
//!
//! ## Two VAT Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PURCHASE ORDER  (order_totals)     SALES INVOICE  (invoice_totals)    │
//! │                                                                         │
//! │  subtotal            100,000        subtotal            100,000        │
//! │  discount (10%)       10,000        discount (10%)       10,000        │
//! │  VAT 10% of 100,000   10,000        VAT 10% of  90,000    9,000        │
//! │  ─────────────────────────          ─────────────────────────          │
//! │  total               100,000        total                99,000        │
//! │                                                                         │
//! │  Orders tax the gross subtotal. Invoices tax the amount after          │
//! │  discount. Both are business rules; do not merge them.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::types::{sanitize, LineItem, StockItem, Totals};

// =============================================================================
// Line & Subtotal
// =============================================================================

/// `quantity × unit_price`, or 0 when either operand is zero or not finite.
///
/// ## Example
/// ```rust
/// use dealer_core::calculation::line_total;
///
/// assert_eq!(line_total(2.0, 1500.0), 3000.0);
/// assert_eq!(line_total(f64::NAN, 1500.0), 0.0);
/// ```
pub fn line_total(quantity: f64, unit_price: f64) -> f64 {
    let quantity = sanitize(quantity);
    let unit_price = sanitize(unit_price);

    if quantity == 0.0 || unit_price == 0.0 {
        return 0.0;
    }

    quantity * unit_price
}

/// Sum of [`line_total`] over all lines. An empty slice yields 0.
///
/// Untyped page data goes through [`LineItem::list_from_value`] first, which
/// maps `null` and other non-array values to an empty list.
pub fn subtotal(items: &[LineItem]) -> f64 {
    items
        .iter()
        .map(|item| line_total(item.quantity, item.unit_price))
        .sum()
}

// =============================================================================
// VAT, Discount, Total
// =============================================================================

/// `subtotal × rate / 100`, or 0 when either is zero or not finite.
pub fn vat(subtotal: f64, vat_rate_percent: f64) -> f64 {
    let subtotal = sanitize(subtotal);
    let rate = sanitize(vat_rate_percent);

    if subtotal == 0.0 || rate == 0.0 {
        return 0.0;
    }

    subtotal * rate / 100.0
}

/// Discount for a subtotal.
///
/// ## Precedence
/// 1. A non-zero flat `discount_amount` is returned as-is.
/// 2. Otherwise a non-zero `discount_rate_percent` is applied to the subtotal.
/// 3. Otherwise 0.
///
/// ## Example
/// ```rust
/// use dealer_core::calculation::discount;
///
/// // Flat amount wins over the rate
/// assert_eq!(discount(100_000.0, 10.0, 5_000.0), 5_000.0);
/// assert_eq!(discount(100_000.0, 10.0, 0.0), 10_000.0);
/// ```
pub fn discount(subtotal: f64, discount_rate_percent: f64, discount_amount: f64) -> f64 {
    let amount = sanitize(discount_amount);
    if amount != 0.0 {
        return amount;
    }

    let rate = sanitize(discount_rate_percent);
    if rate != 0.0 {
        return sanitize(subtotal) * rate / 100.0;
    }

    0.0
}

/// `subtotal + vat - discount`.
pub fn total(subtotal: f64, vat_amount: f64, discount_amount: f64) -> f64 {
    sanitize(subtotal) + sanitize(vat_amount) - sanitize(discount_amount)
}

// =============================================================================
// Order & Invoice Totals
// =============================================================================

/// Totals for a purchase order: VAT is charged on the GROSS subtotal.
///
/// Composition order: subtotal → vat(subtotal) → discount(subtotal) → total.
pub fn order_totals(
    items: &[LineItem],
    vat_rate_percent: f64,
    discount_rate_percent: f64,
    discount_amount: f64,
) -> Totals {
    let subtotal = subtotal(items);
    let vat_amount = vat(subtotal, vat_rate_percent);
    let discount_amount = discount(subtotal, discount_rate_percent, discount_amount);

    Totals {
        subtotal,
        vat_amount,
        discount_amount,
        total: total(subtotal, vat_amount, discount_amount),
    }
}

/// Totals for a sales invoice: VAT is charged AFTER the discount.
///
/// Composition order: subtotal → discount(subtotal) →
/// vat(subtotal - discount) → total. A discount larger than the subtotal
/// leaves a taxable base of 0, never a negative VAT.
pub fn invoice_totals(
    items: &[LineItem],
    vat_rate_percent: f64,
    discount_rate_percent: f64,
    discount_amount: f64,
) -> Totals {
    let subtotal = subtotal(items);
    let discount_amount = discount(subtotal, discount_rate_percent, discount_amount);
    let taxable = (subtotal - discount_amount).max(0.0);
    let vat_amount = vat(taxable, vat_rate_percent);

    Totals {
        subtotal,
        vat_amount,
        discount_amount,
        total: total(subtotal, vat_amount, discount_amount),
    }
}

/// Amount still owed on an invoice, never negative.
pub fn invoice_balance(invoice_total: f64, amount_paid: f64) -> f64 {
    (sanitize(invoice_total) - sanitize(amount_paid)).max(0.0)
}

// =============================================================================
// Profit
// =============================================================================

/// `(sell - cost) × quantity`, or 0 when either price is zero or not finite.
pub fn profit(sell_price: f64, cost_price: f64, quantity: f64) -> f64 {
    let sell = sanitize(sell_price);
    let cost = sanitize(cost_price);

    if sell == 0.0 || cost == 0.0 {
        return 0.0;
    }

    (sell - cost) * sanitize(quantity)
}

/// Profit of a single unit.
#[inline]
pub fn unit_profit(sell_price: f64, cost_price: f64) -> f64 {
    profit(sell_price, cost_price, 1.0)
}

/// Profit of one invoice line. The sell price falls back to `unit_price`.
pub fn line_profit(item: &LineItem) -> f64 {
    let sell = item.sell_price.unwrap_or(item.unit_price);
    let cost = item.cost_price.unwrap_or(0.0);
    profit(sell, cost, item.quantity)
}

/// Sum of [`line_profit`] over all lines.
pub fn total_profit(items: &[LineItem]) -> f64 {
    items.iter().map(line_profit).sum()
}

/// Margin over cost, in percent: `(sell - cost) / cost × 100`.
///
/// Returns 0 when the cost is zero or not finite.
///
/// ## Example
/// ```rust
/// use dealer_core::calculation::profit_margin;
///
/// assert_eq!(profit_margin(150.0, 100.0), 50.0);
/// assert_eq!(profit_margin(150.0, 0.0), 0.0);
/// ```
pub fn profit_margin(sell_price: f64, cost_price: f64) -> f64 {
    let cost = sanitize(cost_price);
    if cost == 0.0 {
        return 0.0;
    }

    (sanitize(sell_price) - cost) / cost * 100.0
}

// =============================================================================
// Stock
// =============================================================================

/// Value of stock on hand at cost.
pub fn stock_value(quantity_on_hand: f64, cost_price: f64) -> f64 {
    line_total(quantity_on_hand, cost_price)
}

/// Sum of [`stock_value`] over an inventory listing.
pub fn total_stock_value(items: &[StockItem]) -> f64 {
    items
        .iter()
        .map(|item| stock_value(item.quantity, item.cost_price))
        .sum()
}

/// Units that can still be sold: `max(0, on_hand - reserved)`.
pub fn available_stock(on_hand: f64, reserved: f64) -> f64 {
    (sanitize(on_hand) - sanitize(reserved)).max(0.0)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample_items() -> Vec<LineItem> {
        vec![
            LineItem::new(2.0, 30_000.0),
            LineItem::new(1.0, 40_000.0),
        ]
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(3.0, 2_500.0), 7_500.0);
        assert_eq!(line_total(0.0, 2_500.0), 0.0);
        assert_eq!(line_total(3.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn test_subtotal_is_sum_of_lines() {
        assert_eq!(subtotal(&sample_items()), 100_000.0);
        assert_eq!(subtotal(&[]), 0.0);
    }

    #[test]
    fn test_subtotal_of_null_is_zero() {
        let items = LineItem::list_from_value(&Value::Null);
        assert_eq!(subtotal(&items), 0.0);
    }

    #[test]
    fn test_subtotal_from_page_records() {
        let records = json!([
            {"quantity": 2, "unitPrice": "1500"},
            {"quantity": null, "unitPrice": 99},
            {"unitPrice": 10}
        ]);
        assert_eq!(subtotal(&LineItem::list_from_value(&records)), 3_000.0);
    }

    #[test]
    fn test_vat() {
        assert_eq!(vat(100_000.0, 10.0), 10_000.0);
        assert_eq!(vat(100_000.0, 0.0), 0.0);
        assert_eq!(vat(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_discount_flat_amount_wins() {
        assert_eq!(discount(100_000.0, 10.0, 5_000.0), 5_000.0);
        assert_eq!(discount(100_000.0, 10.0, 0.0), 10_000.0);
        assert_eq!(discount(100_000.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_order_totals_invariant() {
        let totals = order_totals(&sample_items(), 10.0, 5.0, 0.0);
        assert_eq!(totals.subtotal, 100_000.0);
        assert_eq!(totals.vat_amount, 10_000.0);
        assert_eq!(totals.discount_amount, 5_000.0);
        assert_eq!(
            totals.total,
            totals.subtotal + totals.vat_amount - totals.discount_amount
        );
    }

    #[test]
    fn test_totals_identity_across_rates_and_amounts() {
        let carts = [
            Vec::new(),
            sample_items(),
            vec![
                LineItem::new(3.0, 19_990.99),
                LineItem::new(0.5, 1_234.567),
                LineItem::new(7.0, 0.1),
            ],
            vec![LineItem::new(1.0, 45_500_000.0), LineItem::new(2.0, 1_250_000.5)],
        ];
        let vat_rates = [0.0, 5.0, 8.0, 10.0, 12.5, 100.0];
        let discount_rates = [0.0, 1.5, 10.0, 33.3, 100.0];
        let discount_amounts = [0.0, 0.01, 5_000.0, 123_456.78, 1e9];

        for items in &carts {
            for &vat_rate in &vat_rates {
                for &discount_rate in &discount_rates {
                    for &discount_amount in &discount_amounts {
                        for totals in [
                            order_totals(items, vat_rate, discount_rate, discount_amount),
                            invoice_totals(items, vat_rate, discount_rate, discount_amount),
                        ] {
                            assert_eq!(
                                totals.total,
                                totals.subtotal + totals.vat_amount - totals.discount_amount,
                                "{:?} vat={} rate={} amount={}",
                                items,
                                vat_rate,
                                discount_rate,
                                discount_amount
                            );
                            assert_eq!(totals.subtotal, subtotal(items));

                            if discount_amount != 0.0 {
                                assert_eq!(totals.discount_amount, discount_amount);
                            } else {
                                assert_eq!(
                                    totals.discount_amount,
                                    totals.subtotal * discount_rate / 100.0
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_vat_policies_differ_when_discounted() {
        let order = order_totals(&sample_items(), 10.0, 10.0, 0.0);
        let invoice = invoice_totals(&sample_items(), 10.0, 10.0, 0.0);

        assert_eq!(order.vat_amount, 10_000.0);
        assert_eq!(invoice.vat_amount, 9_000.0);
        assert_ne!(order.vat_amount, invoice.vat_amount);
        assert_eq!(order.total, 100_000.0);
        assert_eq!(invoice.total, 99_000.0);
    }

    #[test]
    fn test_vat_policies_agree_without_discount() {
        let order = order_totals(&sample_items(), 10.0, 0.0, 0.0);
        let invoice = invoice_totals(&sample_items(), 10.0, 0.0, 0.0);
        assert_eq!(order, invoice);
    }

    #[test]
    fn test_invoice_discount_larger_than_subtotal() {
        let invoice = invoice_totals(&sample_items(), 10.0, 0.0, 150_000.0);
        assert_eq!(invoice.vat_amount, 0.0);
        assert_eq!(invoice.total, -50_000.0);
    }

    #[test]
    fn test_invoice_balance() {
        assert_eq!(invoice_balance(99_000.0, 50_000.0), 49_000.0);
        assert_eq!(invoice_balance(99_000.0, 120_000.0), 0.0);
    }

    #[test]
    fn test_profit() {
        assert_eq!(profit(150.0, 100.0, 3.0), 150.0);
        assert_eq!(unit_profit(150.0, 100.0), 50.0);
        assert_eq!(profit(0.0, 100.0, 3.0), 0.0);
        assert_eq!(profit(150.0, 0.0, 3.0), 0.0);
    }

    #[test]
    fn test_line_profit_falls_back_to_unit_price() {
        let items = vec![
            LineItem::new(2.0, 150.0).with_cost(100.0),
            LineItem::new(1.0, 150.0).with_cost(100.0).with_sell(180.0),
            LineItem::new(5.0, 150.0),
        ];
        assert_eq!(line_profit(&items[0]), 100.0);
        assert_eq!(line_profit(&items[1]), 80.0);
        assert_eq!(line_profit(&items[2]), 0.0);
        assert_eq!(total_profit(&items), 180.0);
    }

    #[test]
    fn test_profit_margin() {
        assert_eq!(profit_margin(150.0, 100.0), 50.0);
        assert_eq!(profit_margin(150.0, 0.0), 0.0);
        assert_eq!(profit_margin(80.0, 100.0), -20.0);
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(stock_value(4.0, 25_000_000.0), 100_000_000.0);
        let items = vec![StockItem::new(2.0, 10.0), StockItem::new(3.0, 5.0)];
        assert_eq!(total_stock_value(&items), 35.0);
        assert_eq!(total_stock_value(&[]), 0.0);
    }

    #[test]
    fn test_available_stock() {
        assert_eq!(available_stock(10.0, 3.0), 7.0);
        assert_eq!(available_stock(10.0, 0.0), 10.0);
        assert_eq!(available_stock(2.0, 5.0), 0.0);
    }
}
