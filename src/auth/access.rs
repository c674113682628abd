// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access control gate.
//!
//! Every mutating machine operation calls [`authorize`] with the permission
//! named after it before touching the store.

use super::{AuthError, AuthenticatedUser, Permission};

/// Check that the claim's role grants `required`.
///
/// Unknown roles are always denied.
pub fn authorize(user: &AuthenticatedUser, required: Permission) -> Result<(), AuthError> {
    match user.role {
        Some(role) if role.grants(required) => Ok(()),
        role => {
            tracing::warn!(
                user_id = %user.user_id,
                role = ?role,
                permission = %required,
                "Permission denied"
            );
            Err(AuthError::Forbidden)
        }
    }
}
