//! Integration tests for `ThreadPress`.
//!
//! Every upstream the checkout service talks to (catalog, charge plan,
//! location rates, orders, bank details, payment gateway) is mocked as an
//! in-process axum server bound to an ephemeral port, so the suites run
//! self-contained with no external services.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p threadpress-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `upstream_clients` - Each upstream client against its mock
//! - `quote_api` - The pricing endpoints end to end
//! - `checkout_api` - Begin/complete flows, mode gating, verification

use axum::Router;
use hmac::{Hmac, Mac};
use secrecy::SecretString;
use sha2::Sha256;

use threadpress_checkout::config::{CheckoutConfig, GatewayConfig};

/// Signing secret shared between the test config and [`sign`].
pub const TEST_GATEWAY_SECRET: &str = "k7vQ2pXw9eRt4yUi8oLmZx3cNb6aSdJh";

/// An in-process mock upstream bound to an ephemeral port.
pub struct MockUpstream {
    pub base_url: String,
}

/// Serve a router on 127.0.0.1:0 and return its base URL.
///
/// The server task runs until the test process exits; tests never shut
/// their mocks down explicitly.
pub async fn serve(router: Router) -> MockUpstream {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock upstream");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Mock upstream crashed");
    });

    MockUpstream {
        base_url: format!("http://{addr}"),
    }
}

/// Base URLs for each mocked upstream.
pub struct UpstreamUrls {
    pub catalog: String,
    pub charge_plan: String,
    pub location_rates: String,
    pub orders: String,
    pub bank_details: String,
    pub gateway: String,
}

/// Build a service configuration pointing at the mocks.
///
/// Geolocation is disabled (no geocoder); location tests go through the
/// manual-selection path instead.
#[must_use]
pub fn test_config(urls: &UpstreamUrls) -> CheckoutConfig {
    CheckoutConfig {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        catalog_url: urls.catalog.clone(),
        charge_plan_url: urls.charge_plan.clone(),
        location_rates_url: urls.location_rates.clone(),
        orders_url: urls.orders.clone(),
        bank_details_url: urls.bank_details.clone(),
        geocoder: None,
        gateway: GatewayConfig {
            base_url: urls.gateway.clone(),
            key_id: "key_test_1".to_string(),
            key_secret: SecretString::from(TEST_GATEWAY_SECRET),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Produce a valid gateway signature for `order_id|payment_id` with the
/// test secret.
#[must_use]
pub fn sign(order_id: &str, payment_id: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(TEST_GATEWAY_SECRET.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
