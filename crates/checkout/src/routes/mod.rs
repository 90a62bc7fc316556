//! HTTP route handlers for the checkout service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # Pricing
//! POST /api/quote                  - Price a cart (totals + charge breakdown)
//! POST /api/payment-methods        - Payment modes available for a cart
//!
//! # Location
//! GET  /api/location/{session}     - Resolved location for a session
//! PUT  /api/location               - Manually set a session's location
//!
//! # Checkout
//! GET  /api/bank-details           - Active bank/UPI details (netbanking)
//! POST /api/checkout/begin         - Validate and start a checkout
//! POST /api/checkout/complete      - Verify an online payment and finalize
//! ```

pub mod checkout;
pub mod location;
pub mod quote;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/quote", post(quote::quote))
        .route("/api/payment-methods", post(checkout::payment_methods))
        .route("/api/location/{session}", get(location::get_location))
        .route("/api/location", put(location::set_location))
        .route("/api/bank-details", get(checkout::bank_details))
        .route("/api/checkout/begin", post(checkout::begin))
        .route("/api/checkout/complete", post(checkout::complete))
}
