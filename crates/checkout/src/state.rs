//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::checkout::CheckoutService;
use crate::config::CheckoutConfig;
use crate::location::{GeocoderClient, LocationRateClient, LocationResolver};
use crate::orders::OrderClient;
use crate::payment::{BankDetailsClient, GatewayClient};
use crate::rates::{InMemorySnapshotStore, RatePlanClient, RateService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// upstream clients and pipeline services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CheckoutConfig,
    catalog: CatalogClient,
    locations: LocationResolver,
    rates: RateService,
    bank: BankDetailsClient,
    checkout: CheckoutService,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: CheckoutConfig) -> Self {
        let catalog = CatalogClient::new(&config.catalog_url);
        let geocoder = config.geocoder.as_ref().map(GeocoderClient::new);
        let locations = LocationResolver::new(
            geocoder,
            LocationRateClient::new(&config.location_rates_url),
        );
        let rates = RateService::new(
            RatePlanClient::new(&config.charge_plan_url),
            Arc::new(InMemorySnapshotStore::default()),
        );
        let bank = BankDetailsClient::new(&config.bank_details_url);
        let checkout = CheckoutService::new(
            GatewayClient::new(&config.gateway),
            OrderClient::new(&config.orders_url),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                locations,
                rates,
                bank,
                checkout,
            }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &CheckoutConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the location resolver.
    #[must_use]
    pub fn locations(&self) -> &LocationResolver {
        &self.inner.locations
    }

    /// Get a reference to the rate service.
    #[must_use]
    pub fn rates(&self) -> &RateService {
        &self.inner.rates
    }

    /// Get a reference to the bank-details client.
    #[must_use]
    pub fn bank(&self) -> &BankDetailsClient {
        &self.inner.bank
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}
