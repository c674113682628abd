// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{IssuedToken, Permission, Role},
    models::{
        BuyRequest, CreateProductRequest, DepositRequest, LoginRequest, Product, PurchaseReceipt,
        RegisterRequest, UpdateProductRequest, UserProfile,
    },
    state::AppState,
};

pub mod accounts;
pub mod health;
pub mod machine;
pub mod products;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/users/me", get(accounts::get_current_user))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{product_id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/deposit", post(machine::deposit_money))
        .route("/buy", post(machine::buy_product))
        .route("/reset", post(machine::reset_deposit));

    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Registers the bearer token scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Session token issued by POST /v1/login"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        health::liveness,
        health::readiness,
        accounts::register,
        accounts::login,
        accounts::get_current_user,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        machine::deposit_money,
        machine::buy_product,
        machine::reset_deposit
    ),
    components(
        schemas(
            health::HealthResponse,
            machine::ResetDepositResponse,
            IssuedToken,
            Role,
            Permission,
            UserProfile,
            RegisterRequest,
            LoginRequest,
            Product,
            CreateProductRequest,
            UpdateProductRequest,
            DepositRequest,
            BuyRequest,
            PurchaseReceipt
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Accounts", description = "Registration, login and profile"),
        (name = "Products", description = "Product catalog"),
        (name = "Machine", description = "Deposits and purchases")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register_and_login(app: &Router, username: &str, role: &str) -> String {
        let (status, _) = send(
            app,
            "POST",
            "/v1/register",
            None,
            Some(json!({ "username": username, "password": "hunter22", "role": role })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            "POST",
            "/v1/login",
            None,
            Some(json!({ "username": username, "password": "hunter22" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_product(app: &Router, seller: &str, cost: u64, stock: u32) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/v1/products",
            Some(seller),
            Some(json!({ "name": "Cola", "cost": cost, "stock": stock })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (state, _dir) = test_state();
        let app = router(state);
        let (status, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(&app, "GET", "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn deposit_then_buy_returns_change() {
        let (state, _dir) = test_state();
        let app = router(state);
        let seller = register_and_login(&app, "seller", "seller").await;
        let buyer = register_and_login(&app, "buyer", "buyer").await;
        let product_id = create_product(&app, &seller, 60, 10).await;

        let (status, body) = send(
            &app,
            "POST",
            "/v1/deposit",
            Some(&buyer),
            Some(json!({ "amount": 100 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deposit"], 100);

        let (status, body) = send(
            &app,
            "POST",
            "/v1/buy",
            Some(&buyer),
            Some(json!({ "product_id": product_id, "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_price"], 60);
        assert_eq!(body["change"], json!([20, 20]));

        let uri = format!("/v1/products/{product_id}");
        let (_, body) = send(&app, "GET", &uri, Some(&buyer), None).await;
        assert_eq!(body["stock"], 9);

        let (_, body) = send(&app, "GET", "/v1/users/me", Some(&buyer), None).await;
        assert_eq!(body["deposit"], 40);
    }

    #[tokio::test]
    async fn seller_cannot_deposit() {
        let (state, _dir) = test_state();
        let app = router(state);
        let seller = register_and_login(&app, "seller", "seller").await;

        let (status, body) = send(
            &app,
            "POST",
            "/v1/deposit",
            Some(&seller),
            Some(json!({ "amount": 50 })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error_code"], "forbidden");
    }

    #[tokio::test]
    async fn permission_is_checked_before_body() {
        let (state, _dir) = test_state();
        let app = router(state);
        let seller = register_and_login(&app, "seller", "seller").await;
        let buyer = register_and_login(&app, "buyer", "buyer").await;

        let (status, body) = send(
            &app,
            "POST",
            "/v1/deposit",
            Some(&seller),
            Some(json!({ "amount": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error_code"], "forbidden");

        let (status, body) = send(
            &app,
            "POST",
            "/v1/products",
            Some(&buyer),
            Some(json!({ "name": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error_code"], "forbidden");
    }

    #[tokio::test]
    async fn malformed_body_returns_json_error() {
        let (state, _dir) = test_state();
        let app = router(state);
        let buyer = register_and_login(&app, "buyer", "buyer").await;

        let (status, body) = send(
            &app,
            "POST",
            "/v1/deposit",
            Some(&buyer),
            Some(json!({ "amount": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "invalid_request");
        assert!(body["error"].is_string());

        let (status, body) = send(&app, "POST", "/v1/login", None, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "invalid_request");
    }

    #[tokio::test]
    async fn non_integer_amounts_are_invalid_coins() {
        let (state, _dir) = test_state();
        let app = router(state);
        let buyer = register_and_login(&app, "buyer", "buyer").await;

        for amount in [json!(5.0), json!(1e30), json!(u64::MAX)] {
            let (status, body) = send(
                &app,
                "POST",
                "/v1/deposit",
                Some(&buyer),
                Some(json!({ "amount": amount })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error_code"], "invalid_coin");
        }

        let (_, body) = send(&app, "GET", "/v1/users/me", Some(&buyer), None).await;
        assert_eq!(body["deposit"], 0);
    }

    #[tokio::test]
    async fn buyer_cannot_create_products() {
        let (state, _dir) = test_state();
        let app = router(state);
        let buyer = register_and_login(&app, "buyer", "buyer").await;

        let (status, _) = send(
            &app,
            "POST",
            "/v1/products",
            Some(&buyer),
            Some(json!({ "name": "Cola", "cost": 60, "stock": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn invalid_coin_is_rejected() {
        let (state, _dir) = test_state();
        let app = router(state);
        let buyer = register_and_login(&app, "buyer", "buyer").await;

        let (status, body) = send(
            &app,
            "POST",
            "/v1/deposit",
            Some(&buyer),
            Some(json!({ "amount": 7 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "invalid_coin");

        let (_, body) = send(&app, "GET", "/v1/users/me", Some(&buyer), None).await;
        assert_eq!(body["deposit"], 0);
    }

    #[tokio::test]
    async fn reset_returns_balance_to_zero() {
        let (state, _dir) = test_state();
        let app = router(state);
        let buyer = register_and_login(&app, "buyer", "buyer").await;

        for coin in [50, 20, 10, 5] {
            let (status, _) = send(
                &app,
                "POST",
                "/v1/deposit",
                Some(&buyer),
                Some(json!({ "amount": coin })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(&app, "POST", "/v1/reset", Some(&buyer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["returned"], 85);
        assert_eq!(body["deposit"], 0);

        let (_, body) = send(&app, "GET", "/v1/users/me", Some(&buyer), None).await;
        assert_eq!(body["deposit"], 0);
    }

    #[tokio::test]
    async fn insufficient_funds_leaves_state_unchanged() {
        let (state, _dir) = test_state();
        let app = router(state);
        let seller = register_and_login(&app, "seller", "seller").await;
        let buyer = register_and_login(&app, "buyer", "buyer").await;
        let product_id = create_product(&app, &seller, 60, 10).await;

        send(
            &app,
            "POST",
            "/v1/deposit",
            Some(&buyer),
            Some(json!({ "amount": 50 })),
        )
        .await;

        let (status, body) = send(
            &app,
            "POST",
            "/v1/buy",
            Some(&buyer),
            Some(json!({ "product_id": product_id, "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_code"], "insufficient_funds");

        let uri = format!("/v1/products/{product_id}");
        let (_, body) = send(&app, "GET", &uri, Some(&buyer), None).await;
        assert_eq!(body["stock"], 10);
        let (_, body) = send(&app, "GET", "/v1/users/me", Some(&buyer), None).await;
        assert_eq!(body["deposit"], 50);
    }

    #[tokio::test]
    async fn other_seller_cannot_delete_product() {
        let (state, _dir) = test_state();
        let app = router(state);
        let owner = register_and_login(&app, "owner", "seller").await;
        let rival = register_and_login(&app, "rival", "seller").await;
        let product_id = create_product(&app, &owner, 25, 3).await;
        let uri = format!("/v1/products/{product_id}");

        let (status, _) = send(&app, "DELETE", &uri, Some(&rival), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, "DELETE", &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let (state, _dir) = test_state();
        let app = router(state);

        let (status, body) = send(&app, "GET", "/v1/products", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "missing_auth_header");

        let (status, _) = send(&app, "GET", "/v1/products", Some("not.a.jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (state, _dir) = test_state();
        let app = router(state);
        register_and_login(&app, "buyer", "buyer").await;

        let (status, body) = send(
            &app,
            "POST",
            "/v1/login",
            None,
            Some(json!({ "username": "buyer", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "invalid_credentials");
    }

    #[test]
    fn openapi_document_lists_machine_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/v1/buy"));
        assert!(doc.paths.paths.contains_key("/v1/products/{product_id}"));
    }
}
