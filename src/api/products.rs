// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Product catalog endpoints.
//!
//! Reads are open to any authenticated user. Writes require the matching
//! seller permission and ownership of the product.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    auth::{authorize, Auth, Permission},
    error::ApiError,
    machine::Catalog,
    models::{CreateProductRequest, Product, UpdateProductRequest},
    state::AppState,
};

/// List all products.
#[utoipa::path(
    get,
    path = "/v1/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_products(
    Auth(_user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(Catalog::new(&state.db).list_products()?))
}

/// Get a single product.
#[utoipa::path(
    get,
    path = "/v1/products/{product_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(Catalog::new(&state.db).get_product(product_id)?))
}

/// List a new product. Requires `create_product`.
#[utoipa::path(
    post,
    path = "/v1/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid name, cost or malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role lacks create_product")
    )
)]
pub async fn create_product(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    authorize(&user, Permission::CreateProduct)?;
    let Json(request) = body?;
    let product = Catalog::new(&state.db).create_product(user.user_id, request)?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Change a product's name or price. Requires `update_product` and ownership.
#[utoipa::path(
    put,
    path = "/v1/products/{product_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("product_id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Invalid name, cost or malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role lacks update_product or seller is not the owner"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    authorize(&user, Permission::UpdateProduct)?;
    let Json(request) = body?;
    let product = Catalog::new(&state.db).update_product(user.user_id, product_id, request)?;
    Ok(Json(product))
}

/// Remove a product. Requires `delete_product` and ownership.
#[utoipa::path(
    delete,
    path = "/v1/products/{product_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role lacks delete_product or seller is not the owner"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    authorize(&user, Permission::DeleteProduct)?;
    Catalog::new(&state.db).delete_product(user.user_id, product_id)?;
    Ok(StatusCode::NO_CONTENT)
}
