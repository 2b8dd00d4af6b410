//! Gateway router tests
//!
//! Drives the full axum router with `oneshot` requests: authentication,
//! routing, JSON bodies and error rendering.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use common::*;
use despacho_backend::create_app;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use shared::{AssetScope, AssetStatus, OrderStatus};
use tower::ServiceExt;

fn app(api: Arc<InMemoryBackoffice>) -> Router {
    create_app(state(api))
}

fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, "Bearer test-token")
        .header("x-operator", "bodega-1");
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let response = app(Arc::new(InMemoryBackoffice::new()))
        .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let response = app(Arc::new(InMemoryBackoffice::new()))
        .oneshot(Request::builder().uri("/api/v1/sellers").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert!(body["error"]["message_es"].is_string());
}

#[tokio::test]
async fn test_list_sellers() {
    let api = Arc::new(InMemoryBackoffice::new());
    api.add_seller(seller(200, 50));

    let response = app(api)
        .oneshot(authed("GET", "/api/v1/sellers", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["sellers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_seller_balance_includes_available_credit() {
    let api = Arc::new(InMemoryBackoffice::new());
    let s = seller(200, 50);
    let id = s.id;
    api.add_seller(s);

    let response = app(api)
        .oneshot(authed("GET", &format!("/api/v1/sellers/{}/balance", id), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let available: Decimal = body["availableCredit"].as_str().unwrap().parse().unwrap();
    assert_eq!(available, Decimal::from(150));
    assert_eq!(body["name"], "María López");
}

#[tokio::test]
async fn test_overpaying_debt_payment_is_unprocessable() {
    let api = Arc::new(InMemoryBackoffice::new());
    let s = seller(200, 50);
    let id = s.id;
    api.add_seller(s);

    let response = app(api.clone())
        .oneshot(authed(
            "POST",
            &format!("/api/v1/sellers/{}/payments", id),
            Some(json!({ "amount": "50.01" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "OVERPAYMENT");
    assert_eq!(api.payment_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_debt_payment_reduces_debt() {
    let api = Arc::new(InMemoryBackoffice::new());
    let s = seller(200, 50);
    let id = s.id;
    api.add_seller(s);

    let response = app(api.clone())
        .oneshot(authed(
            "POST",
            &format!("/api/v1/sellers/{}/payments", id),
            Some(json!({ "amount": 20, "reference": "REC-12" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(api.seller(id).current_debt, Decimal::from(30));
}

#[tokio::test]
async fn test_available_assets_scope() {
    let api = Arc::new(InMemoryBackoffice::new());
    api.add_asset(asset("TRI-01", AssetScope::Client, AssetStatus::Disponible));
    api.add_asset(asset("TRI-02", AssetScope::Company, AssetStatus::Disponible));
    api.add_asset(asset("TRI-03", AssetScope::Client, AssetStatus::EnUso));

    let response = app(api.clone())
        .oneshot(authed("GET", "/api/v1/assets/available?scope=client", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let assets = body["assets"].as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["code"], "TRI-01");

    let response = app(api)
        .oneshot(authed("GET", "/api/v1/assets/available?scope=garage", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["field"], "scope");
}

#[tokio::test]
async fn test_dispatch_then_settle() {
    let api = Arc::new(InMemoryBackoffice::new());
    let s = seller(200, 50);
    let item = order_item(10, 0, Decimal::from(3));
    let product_id = item.product_id;
    let o = order(s.id, OrderStatus::Pendiente, vec![item]);
    let (seller_id, order_id) = (s.id, o.id);
    api.add_seller(s);
    api.add_order(o);

    let response = app(api.clone())
        .oneshot(authed(
            "POST",
            "/api/v1/dispatches",
            Some(json!({
                "sellerId": seller_id,
                "orderId": order_id,
                "items": [{ "productId": product_id, "quantityOut": 10 }],
                "date": "2026-10-16"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    let load_id = body["load"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["load"]["status"], "open");

    let response = app(api.clone())
        .oneshot(authed(
            "GET",
            &format!("/api/v1/daily-loads/open?sellerId={}", seller_id),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["loads"].as_array().unwrap().len(), 1);

    // Order is now fully delivered, so the whole debt must be paid
    let response = app(api.clone())
        .oneshot(authed(
            "POST",
            &format!("/api/v1/daily-loads/{}/settlement/preview", load_id),
            Some(json!({ "paymentAmount": "20" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let preview = json_body(response).await;
    assert_eq!(preview["isUnderpayingFinal"], true);
    assert_eq!(preview["canClose"], false);

    let response = app(api.clone())
        .oneshot(authed(
            "POST",
            &format!("/api/v1/daily-loads/{}/close", load_id),
            Some(json!({ "paymentAmount": "20" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(response).await["error"]["code"],
        "UNDERPAYMENT_ON_FINAL_DELIVERY"
    );
    assert_eq!(api.close_count(), 0);

    let response = app(api.clone())
        .oneshot(authed(
            "POST",
            &format!("/api/v1/daily-loads/{}/close", load_id),
            Some(json!({ "paymentAmount": "50" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["load"]["status"], "closed");
    assert_eq!(api.close_count(), 1);
    assert_eq!(api.seller(seller_id).current_debt, Decimal::ZERO);

    let response = app(api.clone())
        .oneshot(authed(
            "POST",
            &format!("/api/v1/daily-loads/{}/close", load_id),
            Some(json!({ "paymentAmount": "0" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"]["code"], "LOAD_CLOSED");
}

#[tokio::test]
async fn test_overlong_notes_fail_validation() {
    let api = Arc::new(InMemoryBackoffice::new());
    let s = seller(200, 0);
    let o = order(s.id, OrderStatus::Pendiente, vec![order_item(1, 0, Decimal::ONE)]);
    let body = json!({
        "sellerId": s.id,
        "orderId": o.id,
        "items": [],
        "notes": "x".repeat(501)
    });
    api.add_seller(s);
    api.add_order(o);

    let response = app(api)
        .oneshot(authed("POST", "/api/v1/dispatches", Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "notes");
}
