//! # Role Gating
//!
//! Decides which pages and actions the admin UI shows to a signed-in user.
//!
//! This is presentation gating only. The REST backend enforces the real
//! access rules; anything decided here can be bypassed in the browser.
//!
//! ## Permission Matrix
//! ```text
//! ┌──────────────────────┬───────┬─────────┬───────┬───────────┬────────────┐
//! │ Permission           │ Admin │ Manager │ Sales │ Warehouse │ Accountant │
//! ├──────────────────────┼───────┼─────────┼───────┼───────────┼────────────┤
//! │ ViewInventory        │   ✓   │    ✓    │   ✓   │     ✓     │     ✓      │
//! │ ManageInventory      │   ✓   │    ✓    │       │     ✓     │            │
//! │ ManagePurchaseOrders │   ✓   │    ✓    │       │     ✓     │            │
//! │ ManageInvoices       │   ✓   │    ✓    │   ✓   │           │     ✓      │
//! │ ManageTransfers      │   ✓   │    ✓    │       │     ✓     │            │
//! │ ManagePartners       │   ✓   │    ✓    │   ✓   │           │            │
//! │ ManageCashFlow       │   ✓   │    ✓    │       │           │     ✓      │
//! │ ViewReports          │   ✓   │    ✓    │       │           │     ✓      │
//! │ ManageUsers          │   ✓   │         │       │           │            │
//! └──────────────────────┴───────┴─────────┴───────┴───────────┴────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

/// Role of a signed-in user, as stored in the user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Admin,
    Manager,
    Sales,
    Warehouse,
    Accountant,
}

/// An action or page the UI can gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Permission {
    ViewInventory,
    ManageInventory,
    ManagePurchaseOrders,
    ManageInvoices,
    ManageTransfers,
    ManagePartners,
    ManageCashFlow,
    ViewReports,
    ManageUsers,
}

impl Role {
    /// Every role, highest privilege first.
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manager,
        Role::Sales,
        Role::Warehouse,
        Role::Accountant,
    ];

    /// Returns true if this role may use `permission`.
    pub fn can(&self, permission: Permission) -> bool {
        use Permission::*;

        match self {
            Role::Admin => true,
            Role::Manager => !matches!(permission, ManageUsers),
            Role::Sales => matches!(permission, ViewInventory | ManageInvoices | ManagePartners),
            Role::Warehouse => matches!(
                permission,
                ViewInventory | ManageInventory | ManagePurchaseOrders | ManageTransfers
            ),
            Role::Accountant => matches!(
                permission,
                ViewInventory | ManageInvoices | ManageCashFlow | ViewReports
            ),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Manager => write!(f, "manager"),
            Role::Sales => write!(f, "sales"),
            Role::Warehouse => write!(f, "warehouse"),
            Role::Accountant => write!(f, "accountant"),
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "administrator" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "sales" | "seller" => Ok(Role::Sales),
            "warehouse" | "stock" => Ok(Role::Warehouse),
            "accountant" | "accounting" => Ok(Role::Accountant),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

/// True if `user_role` is one of `allowed`.
pub fn has_any_role(user_role: Option<Role>, allowed: &[Role]) -> bool {
    user_role.is_some_and(|role| allowed.contains(&role))
}

/// True if a user with `user_role` may use `permission`.
///
/// A missing role (signed out, profile not cached yet) is allowed nothing.
pub fn is_allowed(user_role: Option<Role>, permission: Permission) -> bool {
    user_role.is_some_and(|role| role.can(permission))
}
