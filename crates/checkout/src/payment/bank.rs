//! Active bank-details client for the netbanking display path.
//!
//! Netbanking is trust-based: the shopper transfers manually against these
//! details and confirms; no programmatic verification happens.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

/// Errors from the bank-details service.
#[derive(Debug, Error)]
pub enum BankDetailsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// No active bank details are configured.
    #[error("no active bank details")]
    NotConfigured,
}

/// Static payment details shown for the `bank` sub-mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDetails {
    #[serde(rename = "bankName")]
    pub bank_name: String,
    #[serde(rename = "accountNumber")]
    pub account_number: String,
    pub ifsc: String,
    #[serde(rename = "accountHolder")]
    pub account_holder: String,
}

/// Static payment details shown for the `upi` sub-mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpiDetails {
    #[serde(rename = "upiId")]
    pub upi_id: String,
    #[serde(rename = "qrUrl", default)]
    pub qr_url: Option<String>,
}

/// The active bank-details record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveBankDetails {
    pub bankdetails: BankDetails,
    pub upidetails: UpiDetails,
}

/// Client for the active bank-details endpoint.
#[derive(Clone)]
pub struct BankDetailsClient {
    client: reqwest::Client,
    base_url: String,
}

impl BankDetailsClient {
    /// Create a new bank-details client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the currently active bank and UPI details.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or nothing is configured.
    #[instrument(skip(self))]
    pub async fn get_active(&self) -> Result<ActiveBankDetails, BankDetailsError> {
        let url = format!("{}/bank-details/active", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BankDetailsError::NotConfigured);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BankDetailsError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        Ok(response.json().await?)
    }
}
