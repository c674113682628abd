// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::machine::MachineError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            rejection.body_text(),
        )
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!(error = %err, "Blocking task failed");
        Self::internal("Internal error")
    }
}

impl From<MachineError> for ApiError {
    fn from(err: MachineError) -> Self {
        let status = match &err {
            MachineError::InvalidCoin(_)
            | MachineError::InvalidQuantity
            | MachineError::InvalidProduct(_)
            | MachineError::InvalidRegistration(_) => StatusCode::BAD_REQUEST,
            MachineError::NotProductOwner => StatusCode::FORBIDDEN,
            MachineError::ProductNotFound(_) | MachineError::UserNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            MachineError::UsernameTaken(_) => StatusCode::CONFLICT,
            MachineError::InsufficientFunds { .. }
            | MachineError::InsufficientStock { .. }
            | MachineError::BalanceOverflow
            | MachineError::UnrepresentableAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MachineError::Auth(auth) => return Self::from(auth.clone()),
            MachineError::Store(store) => {
                tracing::error!(error = %store, "Store failure");
                return Self::internal("Internal storage error");
            }
        };
        Self::new(status, err.error_code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code,
        });
        (self.status, body).into_response()
    }
}
