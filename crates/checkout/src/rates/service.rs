//! Rate fetching with the stale-is-better-than-broken policy.
//!
//! A failed rate fetch never interrupts a quote: the service keeps
//! returning the last successfully fetched rates (restored from the
//! snapshot store on startup) and logs a warning. Blocking checkout on a
//! rate-fetch failure would be worse than pricing with slightly-stale
//! tiers.
//!
//! Rapid quantity changes can put several fetches in flight at once; a
//! generation counter makes sure only the newest request's response is
//! adopted as shared state, instead of last-response-wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{CheckoutRates, RatePlanClient};

/// Persistence for the last-known rates, so a restart prices with
/// yesterday's tiers instead of zeros until the first fetch lands.
pub trait RateSnapshotStore: Send + Sync {
    /// Load the previously saved rates, if any.
    fn load(&self) -> Option<CheckoutRates>;
    /// Overwrite the saved rates.
    fn save(&self, rates: &CheckoutRates);
}

/// In-memory snapshot store (tests, single-process deployments).
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    rates: std::sync::RwLock<Option<CheckoutRates>>,
}

impl RateSnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Option<CheckoutRates> {
        self.rates.read().ok().and_then(|guard| guard.clone())
    }

    fn save(&self, rates: &CheckoutRates) {
        if let Ok(mut guard) = self.rates.write() {
            *guard = Some(rates.clone());
        }
    }
}

/// Fetches and holds checkout rates.
#[derive(Clone)]
pub struct RateService {
    inner: Arc<RateServiceInner>,
}

struct RateServiceInner {
    client: RatePlanClient,
    last_good: RwLock<Option<CheckoutRates>>,
    generation: AtomicU64,
    store: Arc<dyn RateSnapshotStore>,
}

impl RateService {
    /// Create a new rate service, restoring the last-known rates from the
    /// snapshot store.
    #[must_use]
    pub fn new(client: RatePlanClient, store: Arc<dyn RateSnapshotStore>) -> Self {
        let restored = store.load();
        if restored.is_some() {
            debug!("restored checkout rates from snapshot");
        }
        Self {
            inner: Arc::new(RateServiceInner {
                client,
                last_good: RwLock::new(restored),
                generation: AtomicU64::new(0),
                store,
            }),
        }
    }

    /// Fetch rates for a total quantity.
    ///
    /// On success the rates become the shared last-good value (unless a
    /// newer fetch started meanwhile) and are persisted to the snapshot
    /// store. On failure the last-good value is returned unchanged.
    pub async fn rates_for(&self, total_quantity: u32) -> CheckoutRates {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        match self.inner.client.fetch(total_quantity).await {
            Ok(sheet) => {
                let rates = CheckoutRates::from_sheet(&sheet, total_quantity.max(1));
                if self.inner.generation.load(Ordering::SeqCst) == generation {
                    *self.inner.last_good.write().await = Some(rates.clone());
                    self.inner.store.save(&rates);
                } else {
                    // A newer fetch is in flight; answer this caller with
                    // its own result but leave the shared state to the
                    // newest request.
                    debug!("superseded rate fetch, not persisting");
                }
                rates
            }
            Err(e) => {
                warn!(error = %e, "rate fetch failed, keeping last-known rates");
                self.current().await
            }
        }
    }

    /// The last successfully fetched rates, or zeroed defaults.
    pub async fn current(&self) -> CheckoutRates {
        self.inner
            .last_good
            .read()
            .await
            .clone()
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn snapshot_store_round_trips() {
        let store = InMemorySnapshotStore::default();
        assert!(store.load().is_none());

        let rates = CheckoutRates {
            pf_per_unit: dec!(10),
            gst_percent: dec!(5),
            ..CheckoutRates::default()
        };
        store.save(&rates);
        assert_eq!(store.load(), Some(rates));
    }

    #[tokio::test]
    async fn service_restores_snapshot_on_startup() {
        let store = Arc::new(InMemorySnapshotStore::default());
        let saved = CheckoutRates {
            pf_per_unit: dec!(12),
            printing_per_side: dec!(25),
            gst_percent: dec!(5),
            ..CheckoutRates::default()
        };
        store.save(&saved);

        // Client pointed at nothing reachable; only the restored snapshot
        // can answer.
        let service = RateService::new(RatePlanClient::new("http://127.0.0.1:1"), store);
        assert_eq!(service.current().await, saved);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_last_known_rates() {
        let store = Arc::new(InMemorySnapshotStore::default());
        let saved = CheckoutRates {
            gst_percent: dec!(18),
            ..CheckoutRates::default()
        };
        store.save(&saved);

        let service = RateService::new(RatePlanClient::new("http://127.0.0.1:1"), store);
        // The fetch fails (connection refused) and the stale value wins.
        let rates = service.rates_for(10).await;
        assert_eq!(rates, saved);
    }

    #[tokio::test]
    async fn no_snapshot_and_failed_fetch_yields_zeroes() {
        let service = RateService::new(
            RatePlanClient::new("http://127.0.0.1:1"),
            Arc::new(InMemorySnapshotStore::default()),
        );
        assert_eq!(service.rates_for(3).await, CheckoutRates::default());
    }
}
