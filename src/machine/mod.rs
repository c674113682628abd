// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Vending Machine Core
//!
//! - `coins` - accepted denominations and change decomposition
//! - `ledger` - single-coin deposits and deposit reset
//! - `purchase` - stock/funds validation and atomic purchase commit
//! - `catalog` - seller-owned product management
//! - `accounts` - registration, login and profiles
//!
//! Callers must pass the access gate (`auth::authorize`) before invoking a
//! mutating operation here.

pub mod accounts;
pub mod catalog;
pub mod coins;
pub mod error;
pub mod ledger;
pub mod purchase;

pub use accounts::Accounts;
pub use catalog::Catalog;
pub use coins::{coin_amount, decompose, insert_coin, Coin};
pub use error::MachineError;
pub use ledger::DepositLedger;
pub use purchase::PurchaseEngine;
