//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog base prices are quoted in INR. When a product is added to a cart
//! the base price is adjusted for the shopper's resolved location (percentage
//! markup, then FX conversion) and rounded UP to a whole amount - carts store
//! integer unit prices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create an INR price (the catalog base currency).
    #[must_use]
    pub const fn inr(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::INR)
    }
}

/// Resolve the unit price stored on a cart line.
///
/// Applies the location markup percentage to the base price, converts with
/// the multiplicative FX rate, and rounds up to a whole unit. A `None`
/// markup or rate means the location could not be resolved and the item is
/// treated as unconverted (add 0%, multiply by 1) rather than producing a
/// non-finite price.
#[must_use]
pub fn resolve_unit_price(
    base: Decimal,
    markup_percent: Option<Decimal>,
    fx_rate: Option<Decimal>,
) -> Decimal {
    let markup = markup_percent.unwrap_or(Decimal::ZERO);
    let rate = fx_rate.unwrap_or(Decimal::ONE);
    let marked_up = base + base * markup / Decimal::ONE_HUNDRED;
    (marked_up * rate).ceil()
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// The currency symbol for display.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}
