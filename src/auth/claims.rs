// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::roles::Role;

/// Payload of a session token.
///
/// The role travels as a plain string so that a token carrying a role
/// this build does not know still verifies; such a claim is then denied
/// every permission by the access gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Role name (`buyer` or `seller`)
    pub role: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authenticated user information extracted from a verified token.
///
/// This is the type handlers receive from the `Auth` extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User ID (`sub` claim)
    pub user_id: Uuid,

    /// Recognized role, `None` if the claim named an unknown role
    pub role: Option<Role>,

    /// Token issue time (Unix timestamp)
    pub issued_at: i64,

    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Create from verified session claims.
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            role: Role::parse(&claims.role),
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}
