//! Payment gateway client: order creation and signature verification.

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::instrument;

use threadpress_core::{GatewayOrderId, PaymentId};

use crate::config::GatewayConfig;

type HmacSha256 = Hmac<Sha256>;

/// Errors from the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("Gateway error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Signing key could not be used.
    #[error("invalid signing key")]
    InvalidKey,
}

/// A created gateway order, handed to the hosted checkout widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    #[serde(rename = "orderId")]
    pub order_id: GatewayOrderId,
    /// The amount the gateway will collect (already halved in 50% mode).
    pub amount: Decimal,
}

/// Client for the payment gateway backend.
#[derive(Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: secrecy::SecretString,
}

impl GatewayClient {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }

    /// The public key id, exposed to the checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create a gateway order for an amount.
    ///
    /// `half` requests the 50%-advance variant; the gateway halves the
    /// amount and the response carries the amount actually collected.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway rejects it.
    #[instrument(skip(self), fields(half = half))]
    pub async fn create_order(
        &self,
        amount: Decimal,
        half: bool,
    ) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/orders", self.base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&serde_json::json!({ "amount": amount, "half": half }))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        Ok(response.json().await?)
    }

    /// Verify a payment signature.
    ///
    /// The gateway signs `"{order_id}|{payment_id}"` with the key secret
    /// (HMAC-SHA256, hex). Comparison is constant-time via the MAC
    /// verifier. Returns `false` for a wrong or undecodable signature.
    ///
    /// # Errors
    ///
    /// Returns an error only if the signing key itself is unusable.
    pub fn verify_signature(
        &self,
        order_id: &GatewayOrderId,
        payment_id: &PaymentId,
        signature: &str,
    ) -> Result<bool, GatewayError> {
        let mut mac = HmacSha256::new_from_slice(self.key_secret.expose_secret().as_bytes())
            .map_err(|_| GatewayError::InvalidKey)?;
        mac.update(format!("{order_id}|{payment_id}").as_bytes());

        let Ok(expected) = hex::decode(signature) else {
            return Ok(false);
        };
        Ok(mac.verify_slice(&expected).is_ok())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client(secret: &str) -> GatewayClient {
        GatewayClient::new(&GatewayConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            key_id: "key_test".to_string(),
            key_secret: SecretString::from(secret),
        })
    }

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_verifies() {
        let client = client("s3cr3t-key");
        let signature = sign("s3cr3t-key", "order_1", "pay_1");
        let ok = client
            .verify_signature(
                &GatewayOrderId::new("order_1"),
                &PaymentId::new("pay_1"),
                &signature,
            )
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn tampered_signature_fails() {
        let client = client("s3cr3t-key");
        let signature = sign("s3cr3t-key", "order_1", "pay_1");
        let ok = client
            .verify_signature(
                &GatewayOrderId::new("order_1"),
                &PaymentId::new("pay_2"),
                &signature,
            )
            .unwrap();
        assert!(!ok);
    }

    #[test]
    fn non_hex_signature_fails_cleanly() {
        let client = client("s3cr3t-key");
        let ok = client
            .verify_signature(
                &GatewayOrderId::new("order_1"),
                &PaymentId::new("pay_1"),
                "not hex at all!",
            )
            .unwrap();
        assert!(!ok);
    }
}
