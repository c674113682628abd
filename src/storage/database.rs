// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded machine database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized User
//! - `usernames`: username → user_id (uniqueness index)
//! - `products`: product_id → serialized Product
//!
//! ## Atomicity
//!
//! redb runs one write transaction at a time. Every read-validate-write
//! sequence (`update_user`, `update_product`, `update_user_and_product`,
//! `delete_product_if`) happens inside a single write transaction, so the
//! validation always sees the state that the write replaces. A rejected
//! validation aborts the transaction and nothing is written.

use std::path::Path;

use redb::{
    Database, ReadableDatabase, ReadableTable, Table, TableDefinition, WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::models::{Product, User};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → serialized User (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Index: username → user_id.
const USERNAMES: TableDefinition<&str, &str> = TableDefinition::new("usernames");

/// Primary table: product_id → serialized Product (JSON bytes).
const PRODUCTS: TableDefinition<&str, &[u8]> = TableDefinition::new("products");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    #[error("product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("username already taken: {0}")]
    UsernameTaken(String),
}

pub type DbResult<T> = Result<T, DbError>;

type JsonTable<'txn> = Table<'txn, &'static str, &'static [u8]>;

// =============================================================================
// Record Helpers
// =============================================================================

fn get_json<R, T>(table: &T, key: &str) -> DbResult<Option<R>>
where
    R: DeserializeOwned,
    T: ReadableTable<&'static str, &'static [u8]>,
{
    match table.get(key)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

fn put_json<R: Serialize>(table: &mut JsonTable<'_>, key: &str, record: &R) -> DbResult<()> {
    let json = serde_json::to_vec(record)?;
    table.insert(key, json.as_slice())?;
    Ok(())
}

fn load_user<T>(table: &T, id: Uuid) -> DbResult<User>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    get_json(table, &id.to_string())?.ok_or(DbError::UserNotFound(id))
}

fn load_product<T>(table: &T, id: Uuid) -> DbResult<Product>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    get_json(table, &id.to_string())?.ok_or(DbError::ProductNotFound(id))
}

// =============================================================================
// VendingDatabase
// =============================================================================

/// Credential and catalog store.
pub struct VendingDatabase {
    db: Database,
}

impl VendingDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERNAMES)?;
            let _ = write_txn.open_table(PRODUCTS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Run `body` in a write transaction.
    ///
    /// The outer result carries store failures. The inner result is the
    /// caller's verdict: `Ok` commits, `Err` aborts.
    fn in_write_txn<T, E, F>(&self, body: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&WriteTransaction) -> DbResult<Result<T, E>>,
    {
        let write_txn = self.db.begin_write().map_err(DbError::from)?;
        match body(&write_txn)? {
            Ok(value) => {
                write_txn.commit().map_err(DbError::from)?;
                Ok(value)
            }
            Err(rejected) => {
                write_txn.abort().map_err(DbError::from)?;
                Err(rejected)
            }
        }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user, enforcing username uniqueness.
    pub fn insert_user(&self, user: &User) -> DbResult<()> {
        self.in_write_txn(|txn| {
            let mut usernames = txn.open_table(USERNAMES)?;
            if usernames.get(user.username.as_str())?.is_some() {
                return Ok(Err(DbError::UsernameTaken(user.username.clone())));
            }
            let id = user.id.to_string();
            usernames.insert(user.username.as_str(), id.as_str())?;

            let mut users = txn.open_table(USERS)?;
            put_json(&mut users, &id, user)?;
            Ok(Ok(()))
        })
    }

    /// Look up a user by id.
    pub fn get_user(&self, id: Uuid) -> DbResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        get_json(&table, &id.to_string())
    }

    /// Look up a user by username.
    pub fn find_user_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let usernames = read_txn.open_table(USERNAMES)?;
        let user_id = match usernames.get(username)? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };
        let users = read_txn.open_table(USERS)?;
        get_json(&users, &user_id)
    }

    /// Atomically read a user, apply `apply`, and write it back.
    ///
    /// Fails with `UserNotFound` before `apply` runs if the user is absent.
    /// If `apply` fails nothing is written.
    pub fn update_user<T, E, F>(&self, id: Uuid, apply: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&mut User) -> Result<T, E>,
    {
        self.in_write_txn(|txn| {
            let mut users = txn.open_table(USERS)?;
            let mut user = load_user(&users, id)?;
            let outcome = apply(&mut user);
            if outcome.is_ok() {
                put_json(&mut users, &id.to_string(), &user)?;
            }
            Ok(outcome)
        })
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub fn insert_product(&self, product: &Product) -> DbResult<()> {
        self.in_write_txn(|txn| {
            let mut products = txn.open_table(PRODUCTS)?;
            put_json(&mut products, &product.id.to_string(), product)?;
            Ok(Ok(()))
        })
    }

    /// Confirm the database accepts read transactions.
    pub fn ping(&self) -> DbResult<()> {
        let read_txn = self.db.begin_read()?;
        read_txn.open_table(USERS)?;
        read_txn.open_table(PRODUCTS)?;
        Ok(())
    }

    pub fn get_product(&self, id: Uuid) -> DbResult<Option<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS)?;
        get_json(&table, &id.to_string())
    }

    /// All products, ordered by name.
    pub fn list_products(&self) -> DbResult<Vec<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS)?;

        let mut products = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            products.push(serde_json::from_slice::<Product>(value.value())?);
        }
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    /// Atomically read a product, apply `apply`, and write it back.
    pub fn update_product<T, E, F>(&self, id: Uuid, apply: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&mut Product) -> Result<T, E>,
    {
        self.in_write_txn(|txn| {
            let mut products = txn.open_table(PRODUCTS)?;
            let mut product = load_product(&products, id)?;
            let outcome = apply(&mut product);
            if outcome.is_ok() {
                put_json(&mut products, &id.to_string(), &product)?;
            }
            Ok(outcome)
        })
    }

    /// Delete a product if `check` accepts it, returning the removed record.
    pub fn delete_product_if<E, F>(&self, id: Uuid, check: F) -> Result<Product, E>
    where
        E: From<DbError>,
        F: FnOnce(&Product) -> Result<(), E>,
    {
        self.in_write_txn(|txn| {
            let mut products = txn.open_table(PRODUCTS)?;
            let product = load_product(&products, id)?;
            if let Err(rejected) = check(&product) {
                return Ok(Err(rejected));
            }
            products.remove(id.to_string().as_str())?;
            Ok(Ok(product))
        })
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    /// Atomically read a product and a user, apply `apply` to both, and
    /// write both back in the same commit.
    ///
    /// The product is loaded first, so a missing product is reported as
    /// `ProductNotFound` even when the user is also missing.
    pub fn update_user_and_product<T, E, F>(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        apply: F,
    ) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&mut User, &mut Product) -> Result<T, E>,
    {
        self.in_write_txn(|txn| {
            let mut products = txn.open_table(PRODUCTS)?;
            let mut users = txn.open_table(USERS)?;
            let mut product = load_product(&products, product_id)?;
            let mut user = load_user(&users, user_id)?;

            let outcome = apply(&mut user, &mut product);
            if outcome.is_ok() {
                put_json(&mut users, &user_id.to_string(), &user)?;
                put_json(&mut products, &product_id.to_string(), &product)?;
            }
            Ok(outcome)
        })
    }
}
