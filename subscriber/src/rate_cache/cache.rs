//! The rate cache proper: memory tier over a store tier over an upstream
//! provider (§4.1).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use casino_core::error::{AppError, DomainError, Result};
use casino_core::ports::{ExchangeRateStore, RateProvider};
use casino_core::types::RateEntry;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

struct State {
    rates: HashMap<String, f64>,
    last_update: Option<chrono::DateTime<Utc>>,
}

/// Exchange rate cache with a single shared freshness clock across all
/// currencies, matching the source's one `lastUpdate` field rather than a
/// per-entry TTL (§9 design note).
pub struct RateCache {
    source_currency: String,
    memory_cache_duration: Duration,
    store: Arc<dyn ExchangeRateStore>,
    provider: Arc<dyn RateProvider>,
    state: RwLock<State>,
}

impl std::fmt::Debug for RateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateCache")
            .field("source_currency", &self.source_currency)
            .field("memory_cache_duration", &self.memory_cache_duration)
            .finish_non_exhaustive()
    }
}

impl RateCache {
    #[must_use]
    pub fn new(
        source_currency: String,
        memory_cache_duration: Duration,
        store: Arc<dyn ExchangeRateStore>,
        provider: Arc<dyn RateProvider>,
    ) -> Self {
        Self {
            source_currency,
            memory_cache_duration,
            store,
            provider,
            state: RwLock::new(State {
                rates: HashMap::new(),
                last_update: None,
            }),
        }
    }

    /// Resolve the rate-to-base for `currency` (§4.1 `get_rate`).
    ///
    /// 1. The base currency always converts at `1.0`.
    /// 2. A fresh memory-cache hit is returned directly.
    /// 3. Otherwise the store tier is consulted and, on a hit, promoted
    ///    into the memory tier.
    /// 4. On a store miss *or* a store read error, a full upstream refresh
    ///    is attempted; if the refreshed set still lacks the currency,
    ///    [`DomainError::RateUnavailable`] is returned.
    ///
    /// # Errors
    /// A store miss or store read failure both fall through to a forced
    /// refresh (§4.1 step 4) rather than erroring directly. Returns an
    /// error only if that refresh's upstream fetch or store write fails,
    /// or if the currency is still unavailable afterward.
    #[instrument(skip(self))]
    pub async fn get_rate(&self, currency: &str) -> Result<f64> {
        if currency.eq_ignore_ascii_case(&self.source_currency) {
            return Ok(1.0);
        }

        {
            let state = self.state.read().await;
            if let Some(last_update) = state.last_update {
                if Utc::now().signed_duration_since(last_update).to_std().unwrap_or(Duration::MAX)
                    < self.memory_cache_duration
                {
                    if let Some(rate) = state.rates.get(currency) {
                        return Ok(*rate);
                    }
                }
            }
        }

        match self.store.get_rate(currency).await {
            Ok(Some(entry)) => {
                debug!(currency, rate = entry.rate_to_base, "rate served from store tier");
                let mut state = self.state.write().await;
                state.rates.insert(currency.to_string(), entry.rate_to_base);
                state.last_update = Some(Utc::now());
                return Ok(entry.rate_to_base);
            }
            Ok(None) => {
                warn!(currency, "no cached rate, forcing upstream refresh");
            }
            Err(err) => {
                // §4.1 step 4: a store read error falls through to refresh()
                // exactly like a store miss, rather than failing get_rate
                // outright on a transient store blip.
                warn!(currency, error = %err, "store read failed, forcing upstream refresh");
            }
        }

        self.refresh().await?;

        let state = self.state.read().await;
        state
            .rates
            .get(currency)
            .copied()
            .ok_or_else(|| AppError::Domain(DomainError::RateUnavailable(currency.to_string())))
    }

    /// Force a full refresh from the upstream provider, persisting every
    /// quote to the store and promoting all of them into the memory tier
    /// (§4.1 `refresh`).
    ///
    /// # Errors
    /// Returns an error if the upstream fetch or the store write fails.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        info!(source = %self.source_currency, "refreshing exchange rates from upstream");
        let quotes = self.provider.fetch_quotes(&self.source_currency).await?;

        let entries: Vec<RateEntry> = quotes
            .iter()
            .map(|(currency, rate)| RateEntry {
                currency: currency.clone(),
                rate_to_base: *rate,
                updated_at: Utc::now(),
            })
            .collect();

        self.store.upsert_rates(&entries).await?;

        let mut state = self.state.write().await;
        for entry in &entries {
            state.rates.insert(entry.currency.clone(), entry.rate_to_base);
        }
        state.last_update = Some(Utc::now());

        info!(count = entries.len(), "exchange rates refreshed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;

    use casino_core::ports::rate_provider::mocks::StaticRateProvider;
    use casino_core::ports::rate_store::mocks::MockRateStore;

    use super::*;

    fn cache(store: Arc<MockRateStore>, provider: Arc<StaticRateProvider>) -> RateCache {
        RateCache::new(
            "EUR".to_string(),
            Duration::from_secs(60),
            store,
            provider,
        )
    }

    #[tokio::test]
    async fn base_currency_is_always_one() {
        let store = Arc::new(MockRateStore::new());
        let provider = Arc::new(StaticRateProvider::new(HashMap::new()));
        let cache = cache(store, provider);
        assert_eq!(cache.get_rate("EUR").await.unwrap(), 1.0);
    }

    #[tokio::test]
    async fn falls_back_to_store_tier() {
        let store = Arc::new(MockRateStore::new());
        store.seed("USD", 1.1, Utc::now());
        let provider = Arc::new(StaticRateProvider::new(HashMap::new()));
        let cache = cache(store, provider);
        assert_eq!(cache.get_rate("USD").await.unwrap(), 1.1);
    }

    #[tokio::test]
    async fn falls_back_to_upstream_refresh() {
        let store = Arc::new(MockRateStore::new());
        let mut quotes = HashMap::new();
        quotes.insert("BTC".to_string(), 0.000_02);
        let provider = Arc::new(StaticRateProvider::new(quotes));
        let cache = cache(store, provider);
        assert_eq!(cache.get_rate("BTC").await.unwrap(), 0.000_02);
    }

    #[tokio::test]
    async fn unavailable_after_failed_refresh() {
        let store = Arc::new(MockRateStore::new());
        let provider = Arc::new(StaticRateProvider::failing());
        let cache = cache(store, provider);
        let err = cache.get_rate("XRP").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::UpstreamError(_))
        ));
    }

    #[tokio::test]
    async fn store_read_error_falls_back_to_upstream_refresh() {
        // §4.1 step 4: "on store miss or read error, invoke refresh()" —
        // a failing store must not short-circuit get_rate with a raw
        // propagated error while the upstream still has the quote.
        let store = Arc::new(MockRateStore::failing());
        let mut quotes = HashMap::new();
        quotes.insert("BTC".to_string(), 0.000_02);
        let provider = Arc::new(StaticRateProvider::new(quotes));
        let cache = cache(store, provider);
        assert_eq!(cache.get_rate("BTC").await.unwrap(), 0.000_02);
    }
}
