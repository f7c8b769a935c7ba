//! # dealer-core: Pure Business Logic for the Dealership Admin
//!
//! This crate holds the arithmetic and rules behind the admin pages
//! (purchase orders, sales invoices, inventory, cash flow) as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Dealer Admin Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Admin Pages (web)                            │   │
//! │  │  Orders ──► Invoices ──► Inventory ──► Cash Flow ──► Reports    │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │ line items, records              │ drafts, filters   │
//! │  ┌──────────────▼───────────────────┐  ┌───────────▼───────────────┐   │
//! │  │   ★ dealer-core (THIS CRATE) ★   │  │      dealer-store         │   │
//! │  │                                  │  │                           │   │
//! │  │  calculation   stats   dates     │  │  KeyedStore, namespaces,  │   │
//! │  │  rounding      validation        │  │  TTL cache, session       │   │
//! │  │  permission    format            │  │                           │   │
//! │  │                                  │  └───────────────────────────┘   │
//! │  │  NO I/O • NO STORAGE • PURE      │                                  │
//! │  └──────────────────────────────────┘                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items, totals, stock records, periods
//! - [`calculation`] - Order/invoice totals, VAT, discount, profit, stock
//! - [`stats`] - Sum/average/median, grouping, aggregation by period
//! - [`rounding`] - Half-up rounding helpers
//! - [`dates`] - Date parsing and overdue-day arithmetic (UTC)
//! - [`validation`] - Business rule validation for form input
//! - [`permission`] - Role gating for pages and actions
//! - [`format`] - Currency/number display helpers
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Total Functions**: calculation never panics and never returns an
//!    error. Missing or non-finite numbers count as zero so a totals panel
//!    always renders.
//! 2. **Validate First**: callers that submit financial data run
//!    [`validation`] before trusting any derived value.
//! 3. **Two VAT Policies**: orders tax the gross subtotal, invoices tax the
//!    post-discount amount. They are separate entry points on purpose.
//!
//! ## Example Usage
//!
//! ```rust
//! use dealer_core::calculation::{invoice_totals, order_totals};
//! use dealer_core::LineItem;
//!
//! let items = vec![LineItem::new(2.0, 50_000.0)];
//!
//! let order = order_totals(&items, 10.0, 0.0, 10_000.0);
//! assert_eq!(order.vat_amount, 10_000.0); // 10% of 100,000
//!
//! let invoice = invoice_totals(&items, 10.0, 0.0, 10_000.0);
//! assert_eq!(invoice.vat_amount, 9_000.0); // 10% of 90,000
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculation;
pub mod dates;
pub mod error;
pub mod format;
pub mod permission;
pub mod rounding;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use permission::{Permission, Role};
pub use stats::GroupedSums;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default VAT rate applied by the order and invoice forms (percent).
pub const DEFAULT_VAT_RATE_PERCENT: f64 = 10.0;

/// Default cap for a recent-items list.
pub const DEFAULT_RECENT_ITEMS_MAX: usize = 10;

/// Default cap for the search history.
pub const DEFAULT_SEARCH_HISTORY_MAX: usize = 20;

/// Default lifetime of a cached API response (1 hour).
pub const DEFAULT_CACHE_TTL_MS: i64 = 3_600_000;

/// Largest quantity accepted on a single order or invoice line.
///
/// ## Business Reason
/// Catches typing slips (10000 instead of 10) on dealership paperwork.
pub const MAX_LINE_QUANTITY: f64 = 9_999.0;
