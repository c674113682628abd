// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Machine operation errors.
//!
//! Every validation failure is raised before anything is written, so a
//! rejected request never leaves balances or stock half-updated.

use uuid::Uuid;

use crate::auth::AuthError;
use crate::storage::DbError;

#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    /// Amount is not one of the accepted denominations
    #[error("invalid coin {0}: accepted coins are 5, 10, 20, 50 and 100")]
    InvalidCoin(String),

    /// Balance does not cover `cost * quantity`
    #[error("insufficient funds: deposit of {deposit} does not cover the purchase")]
    InsufficientFunds { deposit: u64 },

    /// Fewer units in stock than requested
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    #[error("product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("invalid product: {0}")]
    InvalidProduct(String),

    /// Seller tried to change a product listed by someone else
    #[error("product is owned by another seller")]
    NotProductOwner,

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("invalid registration: {0}")]
    InvalidRegistration(String),

    #[error("deposit would exceed the maximum balance")]
    BalanceOverflow,

    /// Amount cannot be paid out in accepted coins
    #[error("amount {0} cannot be expressed in accepted coins")]
    UnrepresentableAmount(u64),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Infrastructure failure from the store, surfaced unchanged
    #[error(transparent)]
    Store(DbError),
}

impl MachineError {
    /// Stable machine-readable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            MachineError::InvalidCoin(_) => "invalid_coin",
            MachineError::InsufficientFunds { .. } => "insufficient_funds",
            MachineError::InsufficientStock { .. } => "insufficient_stock",
            MachineError::ProductNotFound(_) => "product_not_found",
            MachineError::UserNotFound(_) => "user_not_found",
            MachineError::InvalidQuantity => "invalid_quantity",
            MachineError::InvalidProduct(_) => "invalid_product",
            MachineError::NotProductOwner => "not_product_owner",
            MachineError::UsernameTaken(_) => "username_taken",
            MachineError::InvalidRegistration(_) => "invalid_registration",
            MachineError::BalanceOverflow => "balance_overflow",
            MachineError::UnrepresentableAmount(_) => "unrepresentable_amount",
            MachineError::Auth(err) => err.error_code(),
            MachineError::Store(_) => "store_error",
        }
    }
}

impl From<DbError> for MachineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UserNotFound(id) => MachineError::UserNotFound(id),
            DbError::ProductNotFound(id) => MachineError::ProductNotFound(id),
            DbError::UsernameTaken(name) => MachineError::UsernameTaken(name),
            other => MachineError::Store(other),
        }
    }
}
