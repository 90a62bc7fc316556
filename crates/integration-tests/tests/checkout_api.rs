//! Begin/complete flows: validation, mode gating, signature verification.

#![allow(clippy::unwrap_used)]

use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::str::FromStr;

use threadpress_checkout::routes;
use threadpress_checkout::state::AppState;

use threadpress_integration_tests::{MockUpstream, UpstreamUrls, serve, sign, test_config};

/// Mocked upstreams plus the service. The order mock echoes a confirmed
/// order and asserts the server-built payload's totals.
async fn spawn_app() -> MockUpstream {
    let catalog = serve(Router::new().route(
        "/products",
        get(|| async {
            Json(json!([{
                "_id": "prod-1",
                "name": "Classic Tee",
                "pricing": [{ "quantity": 1, "price_per": "500", "discount": "0" }],
                "image_url": [],
                "isCorporate": true
            }]))
        }),
    ))
    .await;

    let charge_plan = serve(Router::new().route(
        "/charge-plan/rates",
        get(|| async {
            Json(json!({
                "success": true,
                "data": {
                    "perUnit": { "pakageingandforwarding": "10", "printingcost": "25" },
                    "gstPercent": "5"
                }
            }))
        }),
    ))
    .await;

    let location_rates =
        serve(Router::new().route("/location-rates", post(|| async { Json(json!({})) }))).await;

    let orders = serve(Router::new().route(
        "/orders/complete",
        post(|Json(body): Json<Value>| async move {
            // The payload is rebuilt server-side; client-sent prices never
            // reach this endpoint unchecked.
            let grand = Decimal::from_str(body["orderData"]["breakdown"]["grandTotal"].as_str().unwrap())
                .unwrap();
            assert_eq!(grand, dec!(1050));
            assert_eq!(body["orderData"]["totalPay"], body["orderData"]["breakdown"]["grandTotal"]);

            Json(json!({
                "success": true,
                "order": { "_id": "ord-1", "status": "confirmed" }
            }))
        }),
    ))
    .await;

    let bank_details = serve(Router::new()).await;

    let gateway = serve(Router::new().route(
        "/orders",
        post(|Json(body): Json<Value>| async move {
            Json(json!({ "orderId": "gw_order_1", "amount": body["amount"] }))
        }),
    ))
    .await;

    let config = test_config(&UpstreamUrls {
        catalog: catalog.base_url,
        charge_plan: charge_plan.base_url,
        location_rates: location_rates.base_url,
        orders: orders.base_url,
        bank_details: bank_details.base_url,
        gateway: gateway.base_url,
    });

    serve(
        Router::new()
            .merge(routes::routes())
            .with_state(AppState::new(config)),
    )
    .await
}

fn lines(corporate: bool) -> Value {
    json!([{
        "productId": "prod-1",
        "quantityBySize": { "M": 2 },
        "price": "500",
        "isCorporate": corporate
    }])
}

#[tokio::test]
async fn online_begin_hands_off_to_the_gateway() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/checkout/begin", app.base_url))
        .json(&json!({
            "session": "sess-1",
            "lines": lines(false),
            "mode": "online",
            "address": "221B Baker Street",
            "user": "user-1"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "gateway_checkout");
    assert_eq!(body["order"]["orderId"], "gw_order_1");
    // Full amount up front; the gateway collects the grand total.
    assert_eq!(
        Decimal::from_str(body["order"]["amount"].as_str().unwrap()).unwrap(),
        dec!(1050)
    );
}

#[tokio::test]
async fn store_pickup_completes_without_the_gateway() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/checkout/begin", app.base_url))
        .json(&json!({
            "session": "sess-2",
            "lines": lines(true),
            "mode": "store_pickup",
            "address": "Plot 14, Industrial Estate",
            "user": "user-2"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "completed");
    assert_eq!(body["receipt"]["order_id"], "ord-1");
}

#[tokio::test]
async fn netbanking_requires_a_sub_mode() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/checkout/begin", app.base_url))
        .json(&json!({
            "session": "sess-3",
            "lines": lines(true),
            "mode": "netbanking",
            "address": "Plot 14, Industrial Estate",
            "user": "user-3"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    let response = client
        .post(format!("{}/api/checkout/begin", app.base_url))
        .json(&json!({
            "session": "sess-3",
            "lines": lines(true),
            "mode": "netbanking",
            "netbanking_mode": "upi",
            "address": "Plot 14, Industrial Estate",
            "user": "user-3"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn retail_carts_cannot_use_corporate_modes() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    for mode in ["netbanking", "store_pickup"] {
        let response = client
            .post(format!("{}/api/checkout/begin", app.base_url))
            .json(&json!({
                "session": "sess-4",
                "lines": lines(false),
                "mode": mode,
                "address": "221B Baker Street",
                "user": "user-4"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 403, "mode {mode} must be rejected");
    }
}

#[tokio::test]
async fn begin_validates_address_and_cart() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let empty_cart = client
        .post(format!("{}/api/checkout/begin", app.base_url))
        .json(&json!({
            "session": "sess-5",
            "lines": [],
            "mode": "online",
            "address": "221B Baker Street",
            "user": "user-5"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(empty_cart.status(), 422);

    let blank_address = client
        .post(format!("{}/api/checkout/begin", app.base_url))
        .json(&json!({
            "session": "sess-5",
            "lines": lines(false),
            "mode": "online",
            "address": "   ",
            "user": "user-5"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank_address.status(), 422);
}

#[tokio::test]
async fn complete_verifies_the_gateway_signature() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let good = client
        .post(format!("{}/api/checkout/complete", app.base_url))
        .json(&json!({
            "session": "sess-6",
            "lines": lines(false),
            "mode": "online",
            "gateway_order_id": "gw_order_1",
            "payment_id": "pay_1",
            "signature": sign("gw_order_1", "pay_1"),
            "address": "221B Baker Street",
            "user": "user-6"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(good.status(), 200);
    let body: Value = good.json().await.unwrap();
    assert_eq!(body["order_id"], "ord-1");
    assert_eq!(body["status"], "confirmed");

    let forged = client
        .post(format!("{}/api/checkout/complete", app.base_url))
        .json(&json!({
            "session": "sess-6",
            "lines": lines(false),
            "mode": "online",
            "gateway_order_id": "gw_order_1",
            "payment_id": "pay_1",
            "signature": sign("gw_order_1", "pay_other"),
            "address": "221B Baker Street",
            "user": "user-6"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(forged.status(), 402);
}

#[tokio::test]
async fn complete_rejects_manual_modes() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/checkout/complete", app.base_url))
        .json(&json!({
            "session": "sess-7",
            "lines": lines(true),
            "mode": "store_pickup",
            "gateway_order_id": "gw_order_1",
            "payment_id": "pay_1",
            "signature": sign("gw_order_1", "pay_1"),
            "address": "Plot 14, Industrial Estate",
            "user": "user-7"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}
