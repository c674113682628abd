// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User registration, login and profile lookup.

use uuid::Uuid;

use super::MachineError;
use crate::auth::{
    password::{hash_password, verify_password_or_dummy},
    AuthError, IssuedToken, TokenService,
};
use crate::models::{LoginRequest, RegisterRequest, User, UserProfile};
use crate::storage::VendingDatabase;

pub struct Accounts<'a> {
    db: &'a VendingDatabase,
}

impl<'a> Accounts<'a> {
    pub fn new(db: &'a VendingDatabase) -> Self {
        Self { db }
    }

    /// Create an account with an empty balance.
    pub fn register(&self, request: RegisterRequest) -> Result<UserProfile, MachineError> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(MachineError::InvalidRegistration(
                "username must not be empty".to_string(),
            ));
        }
        if request.password.is_empty() {
            return Err(MachineError::InvalidRegistration(
                "password must not be empty".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: hash_password(&request.password)?,
            role: request.role,
            deposit: 0,
        };
        self.db.insert_user(&user)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user.into())
    }

    /// Check credentials and issue a session token carrying the stored role.
    ///
    /// Unknown usernames and wrong passwords fail identically, each after
    /// one Argon2 verification.
    pub fn login(
        &self,
        tokens: &TokenService,
        request: &LoginRequest,
    ) -> Result<IssuedToken, MachineError> {
        let user = self.db.find_user_by_username(request.username.trim())?;
        let verified = verify_password_or_dummy(
            &request.password,
            user.as_ref().map(|user| user.password_hash.as_str()),
        );
        let user = user
            .filter(|_| verified)
            .ok_or_else(|| {
                tracing::warn!(username = %request.username, "Login failed");
                AuthError::InvalidCredentials
            })?;

        let issued = tokens.issue(user.id, user.role)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(issued)
    }

    pub fn profile(&self, user_id: Uuid) -> Result<UserProfile, MachineError> {
        self.db
            .get_user(user_id)?
            .map(UserProfile::from)
            .ok_or(MachineError::UserNotFound(user_id))
    }
}
