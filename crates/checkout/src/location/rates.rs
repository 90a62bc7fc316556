//! Location rate lookup client (location string -> markup + FX rate).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

/// Errors from the location-rate service.
#[derive(Debug, Error)]
pub enum RateLookupError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response was well-formed JSON but missing or invalid rate fields.
    #[error("malformed rate response: {0}")]
    Malformed(String),
}

/// Raw response shape from the rate service. Both fields are optional on
/// the wire; [`LocationRateClient::lookup`] rejects incomplete responses so
/// callers never see partial data.
#[derive(Debug, Deserialize)]
struct RateResponse {
    percentage: Option<Decimal>,
    currency: Option<RateCurrency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCurrency {
    pub country: String,
    pub toconvert: Decimal,
}

/// A validated markup + FX rate for one location.
#[derive(Debug, Clone)]
pub struct LocationRate {
    /// Percentage added to the subtotal for this market. Non-negative.
    pub percentage: Decimal,
    /// Multiplicative FX rate from INR. Strictly positive.
    pub currency: RateCurrency,
}

/// Client for the location markup/FX service.
#[derive(Clone)]
pub struct LocationRateClient {
    client: reqwest::Client,
    base_url: String,
}

impl LocationRateClient {
    /// Create a new location-rate client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up the markup and FX rate for a location string.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response violates the
    /// rate invariants (`percentage >= 0`, `toconvert > 0`). Callers fall
    /// back to continental defaults on any error.
    #[instrument(skip(self), fields(location = %location))]
    pub async fn lookup(&self, location: &str) -> Result<LocationRate, RateLookupError> {
        let url = format!("{}/location-rates", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "location": location }))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RateLookupError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body: RateResponse = response.json().await?;

        let percentage = body
            .percentage
            .ok_or_else(|| RateLookupError::Malformed("missing percentage".to_string()))?;
        let currency = body
            .currency
            .ok_or_else(|| RateLookupError::Malformed("missing currency".to_string()))?;

        if percentage < Decimal::ZERO {
            return Err(RateLookupError::Malformed(format!(
                "negative percentage: {percentage}"
            )));
        }
        if currency.toconvert <= Decimal::ZERO {
            return Err(RateLookupError::Malformed(format!(
                "non-positive toconvert: {}",
                currency.toconvert
            )));
        }

        Ok(LocationRate {
            percentage,
            currency,
        })
    }
}
