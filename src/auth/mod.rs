// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session tokens and role-gated permissions for the vending machine API.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with username and password
//! 2. Server issues an HS256 session token (`sub`, `role`, `iat`, `exp`)
//! 3. Client sends `Authorization: Bearer <token>`
//! 4. Server:
//!    - Verifies algorithm, signature and expiry
//!    - Checks the claim's role against the permission the operation needs
//!
//! ## Security
//!
//! - The signing secret is supplied through configuration, never compiled in
//! - Tokens expire one hour after issuance
//! - Authentication and authorization fail before any business check runs

pub mod access;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod roles;
pub mod tokens;

pub use access::authorize;
pub use claims::{AuthenticatedUser, SessionClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use roles::{Permission, Role};
pub use tokens::{IssuedToken, TokenService};
