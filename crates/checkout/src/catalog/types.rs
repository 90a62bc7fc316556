//! Product catalog wire types.
//!
//! Field names follow the catalog service's JSON exactly (it predates this
//! service and is not going to be renamed for us).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use threadpress_core::ProductId;

/// A catalog product record, read-only to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    /// Ordered quantity-break price list. The checkout pipeline only uses
    /// the first entry as the base price; the quantity breaks are a catalog
    /// display concern.
    #[serde(default)]
    pub pricing: Vec<PricingTier>,
    /// Per-color image groups.
    #[serde(default)]
    pub image_url: Vec<ImageGroup>,
    #[serde(rename = "isCorporate", default)]
    pub is_corporate: bool,
}

impl Product {
    /// The base (INR) unit price: the first pricing entry.
    #[must_use]
    pub fn base_price(&self) -> Option<Decimal> {
        self.pricing.first().map(|tier| tier.price_per)
    }
}

/// One quantity-break price entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTier {
    pub quantity: u32,
    pub price_per: Decimal,
    #[serde(default)]
    pub discount: Decimal,
}

/// A group of product images for one color option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGroup {
    #[serde(default)]
    pub url: Vec<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub colorcode: String,
}
