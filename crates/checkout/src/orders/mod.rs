//! Order payload construction and the order-completion client.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use threadpress_core::{OrderId, OrderStatus, PaymentId, PaymentMode, UserId};

use crate::cart::CartLine;
use crate::location::LocationTax;

/// Errors from the order-completion service.
#[derive(Debug, Error)]
pub enum OrderApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Service answered but did not confirm the order.
    #[error("order not confirmed: {0}")]
    NotConfirmed(String),
}

/// The location adjustment recorded on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationAdjustment {
    pub country: String,
    pub percentage: Decimal,
    pub currency: CurrencyAdjustment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyAdjustment {
    pub country: String,
    pub toconvert: Decimal,
}

impl From<&LocationTax> for LocationAdjustment {
    fn from(tax: &LocationTax) -> Self {
        Self {
            country: tax.country.clone(),
            percentage: tax.percentage,
            currency: CurrencyAdjustment {
                country: tax.country.clone(),
                toconvert: tax.to_convert,
            },
        }
    }
}

/// The totals recorded on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakdown {
    pub subtotal: Decimal,
    #[serde(rename = "gstTotal")]
    pub gst_total: Decimal,
    #[serde(rename = "grandTotal")]
    pub grand_total: Decimal,
}

/// The finalized checkout request. Constructed once at checkout button
/// press; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayload {
    pub items: Vec<CartLine>,
    #[serde(rename = "totalPay")]
    pub total_pay: Decimal,
    pub address: String,
    pub user: UserId,
    /// GST percent applied to the subtotal.
    pub gst: Decimal,
    #[serde(rename = "locationAdjustment")]
    pub location_adjustment: LocationAdjustment,
    pub breakdown: Breakdown,
}

/// Request body for the order-completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteOrderRequest {
    /// Present only for gateway modes, after verification.
    #[serde(rename = "paymentId", skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<PaymentId>,
    #[serde(rename = "paymentmode")]
    pub payment_mode: PaymentMode,
    #[serde(rename = "orderData")]
    pub payload: OrderPayload,
}

#[derive(Debug, Deserialize)]
struct CompleteOrderResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    order: Option<OrderRecord>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderRecord {
    #[serde(rename = "_id")]
    id: OrderId,
    #[serde(default)]
    status: OrderStatus,
}

/// A confirmed order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// Client for the order-completion service.
#[derive(Clone)]
pub struct OrderClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrderClient {
    /// Create a new order client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Finalize an order after payment (or for a manual mode).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service does not
    /// confirm the order.
    #[instrument(skip(self, request), fields(mode = ?request.payment_mode))]
    pub async fn complete(&self, request: &CompleteOrderRequest) -> Result<OrderReceipt, OrderApiError> {
        let url = format!("{}/orders/complete", self.base_url);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OrderApiError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body: CompleteOrderResponse = response.json().await?;

        if !body.success {
            return Err(OrderApiError::NotConfirmed(
                body.message.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        body.order
            .map(|order| OrderReceipt {
                order_id: order.id,
                status: order.status,
            })
            .ok_or_else(|| OrderApiError::NotConfirmed("missing order record".to_string()))
    }
}
