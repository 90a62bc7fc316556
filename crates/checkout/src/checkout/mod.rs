//! Totals arithmetic and the checkout finalizer.
//!
//! The grand total compounds in a strict order: GST on the subtotal, then
//! the location markup on the GST-inclusive base. Packaging & forwarding
//! and printing charges are computed and shown in the quote breakdown but
//! are NOT folded into the grand total - the storefront has always priced
//! this way and orders must keep matching it (the offline simulator in the
//! CLI is the one place that totals the charges in).

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use threadpress_core::{NetbankingMode, PaymentId, PaymentMode};

use crate::cart::NormalizedCart;
use crate::orders::{
    CompleteOrderRequest, OrderApiError, OrderClient, OrderPayload, OrderReceipt,
};
use crate::payment::{GatewayClient, GatewayError, GatewayOrder};
use crate::rates::CheckoutRates;

/// Checkout-blocking validation and payment failures.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No delivery address was supplied.
    #[error("missing delivery address")]
    MissingAddress,

    /// Netbanking requires a upi/bank sub-mode.
    #[error("missing netbanking sub-mode")]
    MissingNetbankingMode,

    /// The payment mode is not available for this cart.
    #[error("payment mode not available for this cart")]
    ModeNotAllowed,

    /// Nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// The gateway signature did not verify; no order is created.
    #[error("payment verification failed")]
    VerificationFailed,

    /// Gateway call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Order-completion call failed.
    #[error(transparent)]
    Orders(#[from] OrderApiError),
}

/// The compounded totals for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub gst_total: Decimal,
    pub base_total: Decimal,
    pub grand_total: Decimal,
}

/// Compute the totals in their strict order. Each step compounds on the
/// previous; reordering changes the result.
#[must_use]
pub fn compute_totals(
    subtotal: Decimal,
    gst_percent: Decimal,
    location_percentage: Decimal,
) -> Totals {
    let gst_total = subtotal * gst_percent / Decimal::ONE_HUNDRED;
    let base_total = subtotal + gst_total;
    let grand_total = if location_percentage.is_zero() {
        base_total
    } else {
        base_total + base_total * location_percentage / Decimal::ONE_HUNDRED
    };
    Totals {
        subtotal,
        gst_total,
        base_total,
        grand_total,
    }
}

/// Per-unit/flat charges expanded against the cart's quantities.
///
/// Display-only: none of these feed `Totals::grand_total`.
#[derive(Debug, Clone, Serialize)]
pub struct ChargeBreakdown {
    pub rates: CheckoutRates,
    /// `pf_per_unit * quantity + pf_flat`.
    pub pf_total: Decimal,
    /// `print_per_unit * quantity + printing_per_side * printing_units`.
    pub printing_total: Decimal,
}

impl ChargeBreakdown {
    /// Expand flat rates against a cart's quantity and printing units.
    #[must_use]
    pub fn expand(rates: CheckoutRates, total_quantity: u32, printing_units: u32) -> Self {
        let quantity = Decimal::from(total_quantity);
        let pf_total = rates.pf_per_unit * quantity + rates.pf_flat;
        let printing_total = rates.print_per_unit * quantity
            + rates.printing_per_side * Decimal::from(printing_units);
        Self {
            rates,
            pf_total,
            printing_total,
        }
    }
}

/// Which payment modes a cart may use.
///
/// Only B2B carts (any corporate line) are offered netbanking and store
/// pickup; retail carts pay online. Enforced here, server-side, for every
/// completion path - the storefront UI hides options but cannot be
/// trusted to.
#[must_use]
pub fn available_modes(cart: &NormalizedCart) -> Vec<PaymentMode> {
    if cart.is_corporate() {
        vec![
            PaymentMode::Online,
            PaymentMode::Netbanking,
            PaymentMode::StorePickup,
        ]
    } else {
        vec![PaymentMode::Online]
    }
}

/// Whether a cart may finalize with a mode. Half-advance rides the online
/// gateway and is allowed wherever online is.
#[must_use]
pub fn is_mode_allowed(cart: &NormalizedCart, mode: PaymentMode) -> bool {
    !mode.corporate_only() || cart.is_corporate()
}

/// Outcome of beginning a checkout.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BeginOutcome {
    /// Gateway modes: hand the order to the hosted widget, then call
    /// complete with the payment id and signature.
    GatewayCheckout { order: GatewayOrder },
    /// Manual modes complete immediately.
    Completed { receipt: OrderReceipt },
}

/// Drives the four payment paths to an order-completion call.
#[derive(Clone)]
pub struct CheckoutService {
    gateway: GatewayClient,
    orders: OrderClient,
}

impl CheckoutService {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(gateway: GatewayClient, orders: OrderClient) -> Self {
        Self { gateway, orders }
    }

    /// Begin a checkout for a validated cart.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any side effect: empty cart,
    /// missing address, disallowed mode, or a netbanking request without a
    /// sub-mode. Gateway/order service failures pass through.
    pub async fn begin(
        &self,
        cart: &NormalizedCart,
        mode: PaymentMode,
        netbanking_mode: Option<NetbankingMode>,
        payload: OrderPayload,
    ) -> Result<BeginOutcome, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if payload.address.trim().is_empty() {
            return Err(CheckoutError::MissingAddress);
        }
        if !is_mode_allowed(cart, mode) {
            return Err(CheckoutError::ModeNotAllowed);
        }

        match mode {
            PaymentMode::Online | PaymentMode::HalfPayment => {
                let half = mode == PaymentMode::HalfPayment;
                let order = self.gateway.create_order(payload.total_pay, half).await?;
                Ok(BeginOutcome::GatewayCheckout { order })
            }
            PaymentMode::Netbanking => {
                if netbanking_mode.is_none() {
                    return Err(CheckoutError::MissingNetbankingMode);
                }
                let receipt = self.complete_manual(mode, payload).await?;
                Ok(BeginOutcome::Completed { receipt })
            }
            PaymentMode::StorePickup => {
                let receipt = self.complete_manual(mode, payload).await?;
                Ok(BeginOutcome::Completed { receipt })
            }
        }
    }

    /// Complete an online (or half-advance) checkout after the widget
    /// returns.
    ///
    /// Verifies the gateway signature first; a failed verification halts
    /// the flow with no completion call.
    ///
    /// # Errors
    ///
    /// Returns `VerificationFailed` for a bad signature, or the underlying
    /// gateway/order error.
    pub async fn complete_online(
        &self,
        cart: &NormalizedCart,
        gateway_order_id: &threadpress_core::GatewayOrderId,
        payment_id: PaymentId,
        signature: &str,
        mode: PaymentMode,
        payload: OrderPayload,
    ) -> Result<OrderReceipt, CheckoutError> {
        if !mode.uses_gateway() || !is_mode_allowed(cart, mode) {
            return Err(CheckoutError::ModeNotAllowed);
        }

        let verified = self
            .gateway
            .verify_signature(gateway_order_id, &payment_id, signature)?;
        if !verified {
            return Err(CheckoutError::VerificationFailed);
        }

        let request = CompleteOrderRequest {
            payment_id: Some(payment_id),
            payment_mode: mode,
            payload,
        };
        Ok(self.orders.complete(&request).await?)
    }

    async fn complete_manual(
        &self,
        mode: PaymentMode,
        payload: OrderPayload,
    ) -> Result<OrderReceipt, CheckoutError> {
        let request = CompleteOrderRequest {
            payment_id: None,
            payment_mode: mode,
            payload,
        };
        Ok(self.orders.complete(&request).await?)
    }
}
