//! Location resolution: country -> price markup + FX conversion rate.
//!
//! Resolution order per session:
//!
//! 1. A cached resolution younger than 24 hours is reused without any
//!    network call (the shopper sees a "using saved location" notice).
//! 2. Browser coordinates, when supplied, are reverse-geocoded to a
//!    country; geocode failure is silently non-fatal.
//! 3. The location-rate service is asked for the country's markup and FX
//!    rate; failure or malformed data falls back to a small table of
//!    per-continent defaults.
//!
//! Every path ends in finite numbers. Nothing here may ever block a quote:
//! the ultimate default is the domestic market (rate 1, markup 0).

pub mod geocode;
pub mod rates;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use moka::future::Cache;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument, warn};

pub use geocode::{GeocodeError, GeocoderClient, LatLng};
pub use rates::{LocationRate, LocationRateClient, RateCurrency, RateLookupError};

/// How long a cached location resolution stays valid.
pub const LOCATION_CACHE_TTL: Duration = Duration::hours(24);

/// A resolved markup + FX rate for a session.
#[derive(Debug, Clone, Serialize)]
pub struct LocationTax {
    /// Resolved region/country string.
    pub country: String,
    /// Markup percent added to the subtotal. Non-negative.
    pub percentage: Decimal,
    /// Multiplicative FX rate applied to base (INR) prices. Positive.
    pub to_convert: Decimal,
}

impl LocationTax {
    /// The domestic default used when no detection path succeeds.
    #[must_use]
    pub fn domestic() -> Self {
        Self {
            country: "Asia".to_string(),
            percentage: Decimal::ZERO,
            to_convert: Decimal::ONE,
        }
    }
}

/// A cached resolution with its timestamp.
#[derive(Debug, Clone)]
pub struct CachedLocation {
    pub tax: LocationTax,
    pub resolved_at: DateTime<Utc>,
}

impl CachedLocation {
    /// Whether the cached entry is still within the 24h TTL at `now`.
    ///
    /// Exactly 24h old is still fresh; a millisecond past is expired.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.resolved_at) <= LOCATION_CACHE_TTL
    }
}

/// The outcome of a resolution, with a flag for the saved-location notice.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLocation {
    pub tax: LocationTax,
    /// True when served from the 24h cache without a network call.
    pub from_cache: bool,
}

/// Hardcoded per-continent fallbacks used when the rate service fails.
fn continental_default(country: &str) -> LocationTax {
    let (to_convert, percentage) = match country {
        "North America" => (Decimal::new(12, 3), 20), // 0.012
        "Europe" => (Decimal::new(95, 4), 15),        // 0.0095
        "Australia" => (Decimal::new(18, 3), 18),     // 0.018
        // Asia and anything unrecognized: domestic pricing.
        _ => (Decimal::ONE, 0),
    };
    LocationTax {
        country: country.to_string(),
        to_convert,
        percentage: Decimal::from(percentage),
    }
}

/// Resolves and caches per-session location tax data.
#[derive(Clone)]
pub struct LocationResolver {
    inner: Arc<LocationResolverInner>,
}

struct LocationResolverInner {
    geocoder: Option<GeocoderClient>,
    rates: LocationRateClient,
    cache: Cache<String, CachedLocation>,
}

impl LocationResolver {
    /// Create a new resolver. `geocoder` is optional; without it only
    /// manual set-location and defaults are available.
    #[must_use]
    pub fn new(geocoder: Option<GeocoderClient>, rates: LocationRateClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(100_000)
            // Backstop eviction; freshness is checked explicitly so the
            // 24h boundary is exact rather than approximate.
            .time_to_live(StdDuration::from_secs(25 * 60 * 60))
            .build();

        Self {
            inner: Arc::new(LocationResolverInner {
                geocoder,
                rates,
                cache,
            }),
        }
    }

    /// Resolve the location tax for a session.
    ///
    /// Never fails: every error path degrades to defaults.
    #[instrument(skip(self, coords), fields(session = %session))]
    pub async fn resolve(&self, session: &str, coords: Option<LatLng>) -> ResolvedLocation {
        let now = Utc::now();

        if let Some(cached) = self.inner.cache.get(session).await {
            if cached.is_fresh(now) {
                debug!("using saved location");
                return ResolvedLocation {
                    tax: cached.tax,
                    from_cache: true,
                };
            }
            self.inner.cache.invalidate(session).await;
        }

        let country = match (coords, &self.inner.geocoder) {
            (Some(coords), Some(geocoder)) => match geocoder.country_for(coords).await {
                Ok(country) => Some(country),
                Err(e) => {
                    // Denied permission, timeouts and geocode failures are
                    // all non-fatal; keep defaults.
                    debug!(error = %e, "reverse geocode failed, keeping defaults");
                    None
                }
            },
            _ => None,
        };

        match country {
            Some(country) => self.adopt(session, &country).await,
            None => ResolvedLocation {
                tax: LocationTax::domestic(),
                from_cache: false,
            },
        }
    }

    /// Manual set-location path: rate lookup for a user-chosen location
    /// without re-resolving geolocation.
    #[instrument(skip(self), fields(session = %session, location = %location))]
    pub async fn set_location(&self, session: &str, location: &str) -> ResolvedLocation {
        self.adopt(session, location).await
    }

    /// Look up rates for a country, fall back to continental defaults, and
    /// cache whatever was adopted.
    async fn adopt(&self, session: &str, country: &str) -> ResolvedLocation {
        let tax = match self.inner.rates.lookup(country).await {
            Ok(rate) => LocationTax {
                country: country.to_string(),
                percentage: rate.percentage,
                to_convert: rate.currency.toconvert,
            },
            Err(e) => {
                warn!(error = %e, country = %country, "location rate lookup failed, using defaults");
                continental_default(country)
            }
        };

        self.inner
            .cache
            .insert(
                session.to_string(),
                CachedLocation {
                    tax: tax.clone(),
                    resolved_at: Utc::now(),
                },
            )
            .await;

        ResolvedLocation {
            tax,
            from_cache: false,
        }
    }
}
