// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Buyer endpoints: deposit, buy and reset.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::{authorize, Auth, Permission},
    error::ApiError,
    machine::{coin_amount, DepositLedger, PurchaseEngine},
    models::{BuyRequest, DepositRequest, PurchaseReceipt, UserProfile},
    state::AppState,
};

/// Response after resetting a deposit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResetDepositResponse {
    /// Balance handed back to the buyer
    pub returned: u64,
    /// Balance after the reset (always 0)
    pub deposit: u64,
}

/// Insert one coin. Requires `deposit_money`.
#[utoipa::path(
    post,
    path = "/v1/deposit",
    tag = "Machine",
    security(("bearer_auth" = [])),
    request_body = DepositRequest,
    responses(
        (status = 200, description = "Coin accepted", body = UserProfile),
        (status = 400, description = "Not an accepted coin or malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role lacks deposit_money"),
        (status = 404, description = "User not found")
    )
)]
pub async fn deposit_money(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<DepositRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    authorize(&user, Permission::DepositMoney)?;
    let Json(request) = body?;
    let amount = coin_amount(&request.amount)?;
    let updated = DepositLedger::new(&state.db).deposit_money(user.user_id, amount)?;
    Ok(Json(updated.into()))
}

/// Buy a product with the deposited balance. Requires `buy_product`.
#[utoipa::path(
    post,
    path = "/v1/buy",
    tag = "Machine",
    security(("bearer_auth" = [])),
    request_body = BuyRequest,
    responses(
        (status = 200, description = "Purchase committed", body = PurchaseReceipt),
        (status = 400, description = "Quantity is zero or malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role lacks buy_product"),
        (status = 404, description = "Product or user not found"),
        (status = 422, description = "Insufficient stock or funds")
    )
)]
pub async fn buy_product(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<BuyRequest>, JsonRejection>,
) -> Result<Json<PurchaseReceipt>, ApiError> {
    authorize(&user, Permission::BuyProduct)?;
    let Json(request) = body?;
    let receipt =
        PurchaseEngine::new(&state.db).buy(user.user_id, request.product_id, request.quantity)?;
    Ok(Json(receipt))
}

/// Reset the balance to zero. Requires `reset_deposit`.
#[utoipa::path(
    post,
    path = "/v1/reset",
    tag = "Machine",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deposit reset", body = ResetDepositResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role lacks reset_deposit"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reset_deposit(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ResetDepositResponse>, ApiError> {
    authorize(&user, Permission::ResetDeposit)?;
    let previous = DepositLedger::new(&state.db).reset_deposit(user.user_id)?;
    Ok(Json(ResetDepositResponse {
        returned: previous.deposit,
        deposit: 0,
    }))
}
