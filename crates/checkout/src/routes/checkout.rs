//! Checkout begin/complete handlers and payment-mode discovery.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use threadpress_core::{GatewayOrderId, NetbankingMode, PaymentId, PaymentMode, UserId};

use crate::cart::{CartLine, NormalizedCart};
use crate::checkout::{BeginOutcome, available_modes, compute_totals};
use crate::error::Result;
use crate::orders::{Breakdown, OrderPayload, OrderReceipt};
use crate::payment::ActiveBankDetails;
use crate::state::AppState;

use super::quote::normalized_cart;

// ============================================================================
// Payment-mode discovery
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PaymentMethodsRequest {
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Serialize)]
pub struct PaymentMethodsResponse {
    pub modes: Vec<PaymentMode>,
}

/// Payment modes this cart may use. The same gate is re-applied at
/// begin/complete, so this is advisory for rendering only.
#[instrument(skip(state, request))]
pub async fn payment_methods(
    State(state): State<AppState>,
    Json(request): Json<PaymentMethodsRequest>,
) -> Result<Json<PaymentMethodsResponse>> {
    let cart = NormalizedCart::normalize(request.lines, &[]);
    Ok(Json(PaymentMethodsResponse {
        modes: available_modes(&cart),
    }))
}

/// Active bank-transfer and UPI details for the netbanking payment page.
#[instrument(skip(state))]
pub async fn bank_details(State(state): State<AppState>) -> Result<Json<ActiveBankDetails>> {
    let details = state.bank().get_active().await?;
    Ok(Json(details))
}

// ============================================================================
// Begin / complete
// ============================================================================

/// Request body for `POST /api/checkout/begin`.
#[derive(Debug, Deserialize)]
pub struct BeginRequest {
    pub session: String,
    pub lines: Vec<CartLine>,
    pub mode: PaymentMode,
    #[serde(default)]
    pub netbanking_mode: Option<NetbankingMode>,
    pub address: String,
    pub user: UserId,
}

/// Begin a checkout. The order payload is assembled here, server-side,
/// from freshly recomputed totals; client-sent prices are never trusted
/// for the amount charged.
#[instrument(skip(state, request), fields(mode = ?request.mode))]
pub async fn begin(
    State(state): State<AppState>,
    Json(request): Json<BeginRequest>,
) -> Result<Json<BeginOutcome>> {
    let cart = normalized_cart(&state, request.lines).await;
    let payload = build_payload(&state, &cart, &request.session, request.address, request.user).await;

    let outcome = state
        .checkout()
        .begin(&cart, request.mode, request.netbanking_mode, payload)
        .await?;
    info!(mode = ?request.mode, "checkout begun");
    Ok(Json(outcome))
}

/// Request body for `POST /api/checkout/complete`.
#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub session: String,
    pub lines: Vec<CartLine>,
    pub mode: PaymentMode,
    pub gateway_order_id: GatewayOrderId,
    pub payment_id: PaymentId,
    pub signature: String,
    pub address: String,
    pub user: UserId,
}

/// Complete an online checkout after the gateway widget returns. The
/// payload and mode gates are rebuilt and re-checked rather than replayed
/// from the client.
#[instrument(skip(state, request), fields(mode = ?request.mode))]
pub async fn complete(
    State(state): State<AppState>,
    Json(request): Json<CompleteRequest>,
) -> Result<Json<OrderReceipt>> {
    let cart = normalized_cart(&state, request.lines).await;
    let payload = build_payload(&state, &cart, &request.session, request.address, request.user).await;

    let receipt = state
        .checkout()
        .complete_online(
            &cart,
            &request.gateway_order_id,
            request.payment_id,
            &request.signature,
            request.mode,
            payload,
        )
        .await?;
    info!(order_id = %receipt.order_id, "order confirmed");
    Ok(Json(receipt))
}

/// Assemble the immutable order payload from server-side pricing.
async fn build_payload(
    state: &AppState,
    cart: &NormalizedCart,
    session: &str,
    address: String,
    user: UserId,
) -> OrderPayload {
    let location = state.locations().resolve(session, None).await;
    let rates = state.rates().rates_for(cart.total_quantity()).await;
    let totals = compute_totals(cart.subtotal(), rates.gst_percent, location.tax.percentage);

    OrderPayload {
        items: cart.raw_lines(),
        total_pay: totals.grand_total,
        address,
        user,
        gst: rates.gst_percent,
        location_adjustment: (&location.tax).into(),
        breakdown: Breakdown {
            subtotal: totals.subtotal,
            gst_total: totals.gst_total,
            grand_total: totals.grand_total,
        },
    }
}
