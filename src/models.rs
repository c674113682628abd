// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! Persisted records and the request/response structures of the REST API.
//! API types derive `ToSchema` for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Users**: credentials, role and coin balance
//! - **Products**: catalog entries owned by a seller
//! - **Machine**: deposit and purchase payloads

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Role;

// =============================================================================
// User Models
// =============================================================================

/// A stored user account.
///
/// `deposit` is always a sum of accepted coin denominations. It is changed
/// only by the deposit ledger and the purchase engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Argon2id PHC string, never exposed via the API
    pub password_hash: String,
    pub role: Role,
    pub deposit: u64,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    /// Current coin balance
    pub deposit: u64,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            deposit: user.deposit,
        }
    }
}

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Request to log in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Product Models
// =============================================================================

/// A product listed in the machine.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// Unit price, a positive multiple of the smallest coin
    pub cost: u64,
    /// Units available
    pub stock: u32,
    /// The seller who listed the product
    pub seller_id: Uuid,
}

/// Request to list a new product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub cost: u64,
    pub stock: u32,
}

/// Request to change a product's name or price.
///
/// Stock cannot be edited; it only decreases through purchases.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u64>,
}

// =============================================================================
// Machine Models
// =============================================================================

/// Request to insert a single coin.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DepositRequest {
    /// Coin value; must be one of 5, 10, 20, 50, 100.
    /// Any other JSON number is rejected as an invalid coin.
    #[schema(value_type = i64)]
    pub amount: serde_json::Number,
}

/// Request to buy a product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BuyRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Outcome of a committed purchase.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// `cost * quantity`
    pub total_price: u64,
    /// Coin breakdown of the remaining balance, largest first
    pub change: Vec<u64>,
    pub quantity: u32,
}
