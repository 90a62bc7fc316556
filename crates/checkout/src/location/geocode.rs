//! Reverse-geocoding client (lat/lng -> country).

use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::GeocoderConfig;

/// Errors from the reverse-geocoding service.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// No country component in the response.
    #[error("no country in geocode response")]
    NoCountry,
}

/// A latitude/longitude pair from the shopper's browser.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

/// Client for the external mapping API's reverse-geocode endpoint.
#[derive(Clone)]
pub struct GeocoderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeocoderClient {
    /// Create a new geocoder client.
    #[must_use]
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.expose_secret().to_string(),
        }
    }

    /// Resolve coordinates to a country name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response carries no
    /// country component. Callers treat any error as non-fatal.
    #[instrument(skip(self), fields(lat = coords.lat, lng = coords.lng))]
    pub async fn country_for(&self, coords: LatLng) -> Result<String, GeocodeError> {
        let url = format!(
            "{}?latlng={},{}&key={}",
            self.base_url, coords.lat, coords.lng, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body: GeocodeResponse = response.json().await?;

        body.results
            .first()
            .and_then(|result| {
                result
                    .address_components
                    .iter()
                    .find(|c| c.types.iter().any(|t| t == "country"))
                    .map(|c| c.long_name.clone())
            })
            .ok_or(GeocodeError::NoCountry)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn country_is_extracted_from_address_components() {
        let json = serde_json::json!({
            "results": [{
                "address_components": [
                    {"long_name": "Bengaluru", "types": ["locality"]},
                    {"long_name": "India", "types": ["country", "political"]}
                ]
            }]
        });
        let response: GeocodeResponse = serde_json::from_value(json).unwrap();
        let country = response
            .results
            .first()
            .and_then(|r| {
                r.address_components
                    .iter()
                    .find(|c| c.types.iter().any(|t| t == "country"))
            })
            .map(|c| c.long_name.clone());
        assert_eq!(country.as_deref(), Some("India"));
    }
}
