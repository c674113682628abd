// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles and the permissions they grant.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Permission Table
///
/// - `Buyer` - `deposit_money`, `buy_product`, `reset_deposit`
/// - `Seller` - `create_product`, `update_product`, `delete_product`
///
/// The two sets are disjoint and fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Deposits coins and buys products
    Buyer,
    /// Lists products for sale
    Seller,
}

/// A named capability gating one machine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    DepositMoney,
    BuyProduct,
    ResetDeposit,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
}

const BUYER_PERMISSIONS: &[Permission] = &[
    Permission::DepositMoney,
    Permission::BuyProduct,
    Permission::ResetDeposit,
];

const SELLER_PERMISSIONS: &[Permission] = &[
    Permission::CreateProduct,
    Permission::UpdateProduct,
    Permission::DeleteProduct,
];

impl Role {
    /// The fixed permission set of this role.
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::Buyer => BUYER_PERMISSIONS,
            Role::Seller => SELLER_PERMISSIONS,
        }
    }

    /// Check if this role grants the given permission.
    pub fn grants(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Parse role from string (case-insensitive).
    /// Used when reading the role claim of a session token.
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "buyer" => Some(Role::Buyer),
            "seller" => Some(Role::Seller),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::DepositMoney => "deposit_money",
            Permission::BuyProduct => "buy_product",
            Permission::ResetDeposit => "reset_deposit",
            Permission::CreateProduct => "create_product",
            Permission::UpdateProduct => "update_product",
            Permission::DeleteProduct => "delete_product",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
