//! HTTP tests: the full router over an in-memory database.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront::api::{create_router, AppState};

use common::*;

struct TestApp {
    shop: Shop,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let shop = Shop::seed().await;
        let state = AppState::from_config(shop.database.clone(), test_config());
        Self {
            router: create_router(state),
            shop,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn buyer_token(&self) -> String {
        self.login("buyer@example.com", TEST_PASSWORD).await
    }
}

#[tokio::test]
async fn test_root_and_health() {
    let app = TestApp::new().await;

    let (status, _) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "healthy");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    for uri in ["/cart", "/checkout", "/orders", "/users/me"] {
        let (status, body) = app.send(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    let (status, _) = app
        .send(Method::GET, "/cart", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new().await;
    let registration = json!({
        "email": "New.Customer@Example.com",
        "password": "long-enough-pw",
        "name": "Le Van C",
        "phone": "0912345678"
    });

    let (status, body) = app
        .send(Method::POST, "/auth/register", None, Some(registration.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "new.customer@example.com");
    assert!(body.get("password_hash").is_none());

    let (status, body) = app
        .send(Method::POST, "/auth/register", None, Some(registration))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let token = app.login("new.customer@example.com", "long-enough-pw").await;
    let (status, body) = app.send(Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Le Van C");
    assert_eq!(body["membership_level"], "Bronze");

    let (status, body) = app
        .send(
            Method::PUT,
            "/users/me",
            Some(&token),
            Some(json!({ "name": "Le Van D", "email": "buyer@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, _) = app
        .send(
            Method::PUT,
            "/users/me",
            Some(&token),
            Some(json!({ "name": "", "email": "not-an-email" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::PUT,
            "/users/me",
            Some(&token),
            Some(json!({ "name": "Le Van D", "email": "d.le@example.com", "phone": "0999" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Le Van D");
    assert_eq!(body["email"], "d.le@example.com");
    assert_eq!(body["phone"], "0999");
}

#[tokio::test]
async fn test_register_validation_and_bad_login() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "password": "short", "name": "X" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "buyer@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "ghost@example.com", "password": "whatever-pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_catalog_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/products?per_page=1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["total"], 2);

    let uri = format!("/products/{}", app.shop.product_a);
    let (status, body) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Linen shirt");

    let uri = format!("/products/{}", uuid::Uuid::new_v4());
    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(Method::GET, "/products?search=scarf&per_page=5", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Silk scarf");

    let (status, body) = app.send(Method::GET, "/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Shirts");

    let uri = format!("/products?category_id={}", body[0]["id"].as_str().unwrap());
    let (status, body) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
}

#[tokio::test]
async fn test_cart_endpoints() {
    let app = TestApp::new().await;
    let token = app.buyer_token().await;

    let (status, body) = app.send(Method::GET, "/cart/count", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 3);
    assert_eq!(body["total_amount"], 250_000);

    let (status, body) = app
        .send(
            Method::POST,
            "/cart/items",
            Some(&token),
            Some(json!({ "product_id": app.shop.product_a, "quantity": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .send(
            Method::POST,
            "/cart/items",
            Some(&token),
            Some(json!({ "product_id": app.shop.product_b, "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "OUT_OF_STOCK");

    let (status, body) = app.send(Method::GET, "/cart", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let shirt_line = items[0]["id"].as_str().unwrap().to_string();

    let uri = format!("/cart/items/{}", shirt_line);
    let (status, body) = app
        .send(Method::PUT, &uri, Some(&token), Some(json!({ "quantity": 5 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 6);

    let (status, body) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 1);

    let (status, _) = app.send(Method::DELETE, "/cart", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.send(Method::GET, "/cart", Some(&token), None).await;
    assert_eq!(body["is_empty"], true);
}

#[tokio::test]
async fn test_checkout_flow() {
    let app = TestApp::new().await;
    let token = app.buyer_token().await;

    let (status, body) = app.send(Method::GET, "/checkout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer_email"], "buyer@example.com");
    assert_eq!(body["cart"]["total_amount"], 250_000);

    let (status, order) = app.send(Method::POST, "/checkout", Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total_amount"], 250_000);
    assert_eq!(order["status"], "Pending");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);

    let (status, body) = app.send(Method::POST, "/checkout", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "EMPTY_CART");

    let (status, body) = app
        .send(Method::GET, "/orders/status-counts", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pending"], 1);

    let uri = format!("/orders/{}", order["id"].as_str().unwrap());
    let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer_phone"], "0901234567");

    let (status, body) = app
        .send(Method::GET, "/orders?status=pending", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    assert_eq!(stock_of(app.shop.db(), app.shop.product_b).await, Some(0));
}

#[tokio::test]
async fn test_checkout_out_of_stock_is_conflict() {
    let app = TestApp::new().await;
    let token = app.buyer_token().await;
    set_stock(app.shop.db(), app.shop.product_b, 0).await;

    let (status, body) = app.send(Method::POST, "/checkout", Some(&token), None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "OUT_OF_STOCK");
    assert!(body["error"]["message"].as_str().unwrap().contains("Silk scarf"));
    assert_eq!(order_count(app.shop.db()).await, 0);
}

#[tokio::test]
async fn test_unknown_order_status_filter_is_bad_request() {
    let app = TestApp::new().await;
    let token = app.buyer_token().await;

    let (status, body) = app
        .send(Method::GET, "/orders?status=lost", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}
