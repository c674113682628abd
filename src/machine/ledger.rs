// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deposit ledger: one coin at a time onto a buyer's balance.

use uuid::Uuid;

use super::{coins::insert_coin, MachineError};
use crate::models::User;
use crate::storage::VendingDatabase;

/// Tracks buyers' accumulated coin balances.
pub struct DepositLedger<'a> {
    db: &'a VendingDatabase,
}

impl<'a> DepositLedger<'a> {
    pub fn new(db: &'a VendingDatabase) -> Self {
        Self { db }
    }

    /// Add a single coin to the user's balance.
    ///
    /// The coin is checked before the store is touched; an invalid coin
    /// never mutates anything.
    pub fn deposit_money(&self, user_id: Uuid, amount: i64) -> Result<User, MachineError> {
        let coin = insert_coin(amount).inspect_err(|_| {
            tracing::warn!(user_id = %user_id, amount, "Rejected invalid coin");
        })?;

        let user = self.db.update_user(user_id, |user| {
            user.deposit = user
                .deposit
                .checked_add(coin.value())
                .ok_or(MachineError::BalanceOverflow)?;
            Ok::<_, MachineError>(user.clone())
        })?;

        tracing::info!(
            user_id = %user_id,
            amount = coin.value(),
            deposit = user.deposit,
            "Coin deposited"
        );
        Ok(user)
    }

    /// Set the user's balance back to zero.
    ///
    /// Returns the user as stored before the reset, so callers can report
    /// the amount handed back.
    pub fn reset_deposit(&self, user_id: Uuid) -> Result<User, MachineError> {
        let previous = self.db.update_user(user_id, |user| {
            let previous = user.clone();
            user.deposit = 0;
            Ok::<_, MachineError>(previous)
        })?;

        tracing::info!(
            user_id = %user_id,
            returned = previous.deposit,
            "Deposit reset"
        );
        Ok(previous)
    }
}
