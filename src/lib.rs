// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vending Machine Server - Coin-operated vending machine over HTTP
//!
//! Buyers deposit coins and buy products. Sellers list and manage the
//! products they own. Every purchase is committed atomically against a
//! redb database.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session tokens, password hashing and the access control gate
//! - `machine` - Deposit ledger, purchase engine, catalog and accounts
//! - `storage` - ACID persistence (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod machine;
pub mod models;
pub mod state;
pub mod storage;
