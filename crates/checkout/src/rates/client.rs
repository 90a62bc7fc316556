//! Charge-plan rate service client.
//!
//! The endpoint answers in one of two shapes depending on its deployment
//! vintage; both deserialize into [`RateSheet`] here so nothing downstream
//! ever branches on which optional fields are present.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use super::{RateSheet, SlabRate};

/// Errors from the rate service.
#[derive(Debug, Error)]
pub enum RateError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response matched neither known shape.
    #[error("unrecognized rate response: {0}")]
    Parse(String),

    /// Per-unit response with `success: false`.
    #[error("rate service reported failure")]
    Unsuccessful,
}

/// Raw wire shapes. `untagged` tries them in order; the per-unit shape is
/// first because its `success` field makes it unambiguous.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireResponse {
    PerUnit {
        success: bool,
        data: PerUnitData,
    },
    Slab {
        slabs: Vec<SlabRate>,
        #[serde(rename = "gstRate")]
        gst_rate: Decimal,
    },
}

#[derive(Debug, Deserialize)]
struct PerUnitData {
    #[serde(rename = "perUnit")]
    per_unit: PerUnitRates,
    #[serde(rename = "gstPercent")]
    gst_percent: Decimal,
}

#[derive(Debug, Deserialize)]
struct PerUnitRates {
    pakageingandforwarding: Decimal,
    printingcost: Decimal,
}

/// Client for the charge-plan rate endpoint.
#[derive(Clone)]
pub struct RatePlanClient {
    client: reqwest::Client,
    base_url: String,
}

impl RatePlanClient {
    /// Create a new rate-plan client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the rate sheet for a total quantity.
    ///
    /// The quantity is clamped to at least 1 so an emptying cart never
    /// issues a zero-quantity query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body matches neither
    /// response shape. Callers keep their last good rates on error.
    #[instrument(skip(self))]
    pub async fn fetch(&self, total_quantity: u32) -> Result<RateSheet, RateError> {
        let qty = total_quantity.max(1);
        let url = format!("{}/charge-plan/rates?qty={qty}", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RateError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let wire: WireResponse =
            serde_json::from_str(&body).map_err(|e| RateError::Parse(e.to_string()))?;

        match wire {
            WireResponse::PerUnit { success: false, .. } => Err(RateError::Unsuccessful),
            WireResponse::PerUnit { data, .. } => Ok(RateSheet::PerUnit {
                pf_per_unit: data.per_unit.pakageingandforwarding,
                print_per_unit: data.per_unit.printingcost,
                gst_percent: data.gst_percent,
            }),
            WireResponse::Slab { slabs, gst_rate } => Ok(RateSheet::Slab { slabs, gst_rate }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::rates::CheckoutRates;

    use super::*;

    #[test]
    fn per_unit_shape_parses() {
        let json = serde_json::json!({
            "success": true,
            "data": {
                "perUnit": {"pakageingandforwarding": 10, "printingcost": 20},
                "gstPercent": 5
            }
        });
        let wire: WireResponse = serde_json::from_value(json).unwrap();
        let WireResponse::PerUnit { success, data } = wire else {
            panic!("expected per-unit shape");
        };
        assert!(success);
        assert_eq!(data.per_unit.pakageingandforwarding, dec!(10));
        assert_eq!(data.gst_percent, dec!(5));
    }

    #[test]
    fn slab_shape_parses() {
        let json = serde_json::json!({
            "slabs": [
                {"min": 1, "max": 24, "pnfPerUnit": 8, "pnfFlat": 40, "printingPerSide": 25}
            ],
            "gstRate": 0.05
        });
        let wire: WireResponse = serde_json::from_value(json).unwrap();
        let WireResponse::Slab { slabs, gst_rate } = wire else {
            panic!("expected slab shape");
        };
        assert_eq!(slabs.len(), 1);
        assert_eq!(gst_rate, dec!(0.05));

        let rates = CheckoutRates::from_sheet(&RateSheet::Slab { slabs, gst_rate }, 10);
        assert_eq!(rates.gst_percent, dec!(5));
    }

    #[test]
    fn garbage_body_matches_neither_shape() {
        let result: Result<WireResponse, _> =
            serde_json::from_value(serde_json::json!({"hello": "world"}));
        assert!(result.is_err());
    }
}
