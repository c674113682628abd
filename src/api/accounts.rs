// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login and current-user endpoints.
//!
//! Argon2 work runs on the blocking thread pool.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{Auth, IssuedToken},
    error::ApiError,
    machine::Accounts,
    models::{LoginRequest, RegisterRequest, UserProfile},
    state::AppState,
};

/// Register a new buyer or seller account.
#[utoipa::path(
    post,
    path = "/v1/register",
    tag = "Accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Empty username or password, or malformed body"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let Json(request) = body?;
    let profile =
        tokio::task::spawn_blocking(move || Accounts::new(&state.db).register(request)).await??;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Exchange username and password for a one-hour session token.
#[utoipa::path(
    post,
    path = "/v1/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = IssuedToken),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<IssuedToken>, ApiError> {
    let Json(request) = body?;
    let issued = tokio::task::spawn_blocking(move || {
        Accounts::new(&state.db).login(&state.tokens, &request)
    })
    .await??;
    Ok(Json(issued))
}

/// Get the current user's profile, including the coin balance.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn get_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = Accounts::new(&state.db).profile(user.user_id)?;
    Ok(Json(profile))
}
