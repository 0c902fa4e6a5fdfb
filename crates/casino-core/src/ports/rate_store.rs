//! Exchange rate persistence port (§4.1 store tier, §6 `exchange_rates` table).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::RateEntry;

/// Port for the durable (store-tier) side of the rate cache.
#[async_trait]
pub trait ExchangeRateStore: Send + Sync {
    /// Fetch a single persisted rate, if present.
    async fn get_rate(&self, currency: &str) -> Result<Option<RateEntry>>;

    /// Upsert a batch of rates, all stamped with the same `updated_at`.
    async fn upsert_rates(&self, rates: &[RateEntry]) -> Result<()>;

    /// List every persisted rate, ordered by currency (§6 `refresh-rates` table dump).
    async fn list_rates(&self) -> Result<Vec<RateEntry>>;
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks {
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use super::{DateTime, ExchangeRateStore, RateEntry, Result, Utc};
    use crate::error::{AppError, InfraError};
    use async_trait::async_trait;

    /// In-memory rate store double.
    #[derive(Debug, Default)]
    pub struct MockRateStore {
        rates: Mutex<HashMap<String, RateEntry>>,
        failing: std::sync::atomic::AtomicBool,
    }

    impl MockRateStore {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A store whose `get_rate` always returns a read error, for
        /// exercising the rate cache's store-error fallback (§4.1 step 4).
        #[must_use]
        pub fn failing() -> Self {
            Self {
                rates: Mutex::new(HashMap::new()),
                failing: std::sync::atomic::AtomicBool::new(true),
            }
        }

        pub fn seed(&self, currency: &str, rate_to_base: f64, updated_at: DateTime<Utc>) {
            self.rates.lock().insert(
                currency.to_string(),
                RateEntry {
                    currency: currency.to_string(),
                    rate_to_base,
                    updated_at,
                },
            );
        }
    }

    #[async_trait]
    impl ExchangeRateStore for MockRateStore {
        async fn get_rate(&self, currency: &str) -> Result<Option<RateEntry>> {
            if self.failing.load(std::sync::atomic::Ordering::Relaxed) {
                return Err(AppError::Infra(InfraError::Timeout(
                    "simulated store read failure".to_string(),
                )));
            }
            Ok(self.rates.lock().get(currency).cloned())
        }

        async fn upsert_rates(&self, rates: &[RateEntry]) -> Result<()> {
            let mut guard = self.rates.lock();
            for rate in rates {
                guard.insert(rate.currency.clone(), rate.clone());
            }
            Ok(())
        }

        async fn list_rates(&self) -> Result<Vec<RateEntry>> {
            let mut rates: Vec<RateEntry> = self.rates.lock().values().cloned().collect();
            rates.sort_by(|a, b| a.currency.cmp(&b.currency));
            Ok(rates)
        }
    }
}
