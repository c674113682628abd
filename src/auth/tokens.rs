// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuing and verification.
//!
//! ## Security
//!
//! - Tokens are HS256 JWTs signed with the secret from `JWT_SECRET`
//! - The header algorithm is checked explicitly before decoding, so a token
//!   re-signed under another algorithm is rejected as `UnexpectedAlgorithm`
//! - Tokens expire one hour after issuance, with no clock skew leeway

use chrono::Utc;
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{claims::SessionClaims, AuthError, Role};
use crate::config::SigningSecret;

/// The only algorithm accepted for session tokens.
const EXPECTED_ALGORITHM: Algorithm = Algorithm::HS256;

/// Session lifetime (1 hour).
pub const TOKEN_TTL_SECS: i64 = 3600;

/// A freshly signed session token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuedToken {
    /// Compact JWT to send as `Authorization: Bearer <token>`
    pub token: String,
    /// Expiration (Unix timestamp)
    pub expires_at: i64,
}

/// Issues and verifies signed session claims.
///
/// Pure computation over the token string and the configured secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.expose()),
            decoding: DecodingKey::from_secret(secret.expose()),
        }
    }

    /// Issue a token for `user_id` valid for one hour from now.
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, role, Utc::now().timestamp())
    }

    /// Issue a token as if it were signed at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: Uuid,
        role: Role,
        issued_at: i64,
    ) -> Result<IssuedToken, AuthError> {
        let claims = SessionClaims {
            sub: user_id,
            role: role.as_str().to_string(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
        };

        let token = encode(&Header::new(EXPECTED_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        if header.alg != EXPECTED_ALGORITHM {
            tracing::warn!(algorithm = ?header.alg, "Rejected token with unexpected algorithm");
            return Err(AuthError::UnexpectedAlgorithm);
        }

        let mut validation = Validation::new(EXPECTED_ALGORITHM);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<SessionClaims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => AuthError::UnexpectedAlgorithm,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }
}
