// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent credential and catalog storage in a single redb file.
//! The machine core only reaches the store through the atomic
//! read-validate-write primitives of [`VendingDatabase`].

pub mod database;

pub use database::{DbError, DbResult, VendingDatabase};
