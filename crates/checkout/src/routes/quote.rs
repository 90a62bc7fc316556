//! Cart pricing: normalize, resolve location, fetch rates, compound totals.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use threadpress_core::PaymentMode;

use crate::cart::{CartLine, NormalizedCart};
use crate::checkout::{ChargeBreakdown, Totals, available_modes, compute_totals};
use crate::error::Result;
use crate::location::{LatLng, ResolvedLocation};
use crate::state::AppState;

/// Request body for `POST /api/quote`.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    /// Session key the resolved location is cached under.
    pub session: String,
    /// Browser coordinates, when the client obtained permission.
    #[serde(default)]
    pub coords: Option<LatLng>,
    pub lines: Vec<CartLine>,
}

/// A priced cart.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub total_quantity: u32,
    pub printing_units: u32,
    pub totals: Totals,
    pub charges: ChargeBreakdown,
    pub location: ResolvedLocation,
    pub available_modes: Vec<PaymentMode>,
}

/// Price a cart. Recomputed from scratch on every call; the response is a
/// pure function of the cart lines, the session's location, and the
/// current charge plan.
#[instrument(skip(state, request), fields(lines = request.lines.len()))]
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let cart = normalized_cart(&state, request.lines).await;
    let location = state
        .locations()
        .resolve(&request.session, request.coords)
        .await;

    let total_quantity = cart.total_quantity();
    let rates = state.rates().rates_for(total_quantity).await;

    let totals = compute_totals(cart.subtotal(), rates.gst_percent, location.tax.percentage);
    let charges = ChargeBreakdown::expand(rates, total_quantity, cart.printing_units());

    Ok(Json(QuoteResponse {
        total_quantity,
        printing_units: cart.printing_units(),
        available_modes: available_modes(&cart),
        totals,
        charges,
        location,
    }))
}

/// Merge cart lines with the catalog. A catalog outage degrades to the
/// cart's own snapshot rather than failing the quote.
pub(super) async fn normalized_cart(state: &AppState, lines: Vec<CartLine>) -> NormalizedCart {
    match state.catalog().list_products().await {
        Ok(products) => NormalizedCart::normalize(lines, &products),
        Err(err) => {
            warn!(error = %err, "catalog unavailable, pricing from cart snapshot");
            NormalizedCart::normalize(lines, &[])
        }
    }
}
