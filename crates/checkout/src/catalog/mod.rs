//! Product catalog API client.
//!
//! Plain JSON-over-HTTP client with `moka` response caching (5-minute TTL).
//! The catalog is the source of truth for product records; cart lines are
//! merged against fresh catalog data on every quote.

mod cache;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use threadpress_core::ProductId;

use cache::CacheValue;
pub use types::{ImageGroup, PricingTier, Product};

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Product not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the product catalog service.
///
/// Product lookups are cached for 5 minutes.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let cache_key = "products".to_string();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let url = format!("{}/products", self.inner.base_url);
        let products: Vec<Product> = self.get_json(&url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, CatalogError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = format!("{}/products/{product_id}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!(
                "Product not found: {product_id}"
            )));
        }

        let product: Product = Self::parse_response(response).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CatalogError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e.to_string())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn product_deserializes_catalog_shape() {
        let json = serde_json::json!({
            "_id": "64af3c2e9b1d",
            "name": "Classic Tee",
            "pricing": [
                {"quantity": 1, "price_per": "500", "discount": "0"},
                {"quantity": 50, "price_per": "450", "discount": "10"}
            ],
            "image_url": [
                {"url": ["a.png"], "color": "Black", "colorcode": "#000000"}
            ],
            "isCorporate": true
        });

        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.id.as_str(), "64af3c2e9b1d");
        assert!(product.is_corporate);
        // Base price is pricing[0], not the best quantity break.
        assert_eq!(product.base_price().unwrap().to_string(), "500");
    }

    #[test]
    fn product_tolerates_missing_optional_fields() {
        let json = serde_json::json!({"_id": "p1"});
        let product: Product = serde_json::from_value(json).unwrap();
        assert!(product.pricing.is_empty());
        assert!(!product.is_corporate);
        assert!(product.base_price().is_none());
    }
}
