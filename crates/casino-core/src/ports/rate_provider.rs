//! Upstream exchange-rate provider port (§4.1 upstream tier).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;

/// A set of quotes fetched from the upstream provider, keyed by quote
/// currency (e.g. `"USDBTC"` stripped down to `"BTC"` per §4.1 step 5 —
/// stripping the source-currency prefix is the adapter's responsibility,
/// not the port's).
pub type QuoteSet = HashMap<String, f64>;

/// Port for fetching fresh exchange rates from an upstream API.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetch all quotes for the given source (base) currency.
    async fn fetch_quotes(&self, base: &str) -> Result<QuoteSet>;
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks {
    use parking_lot::Mutex;

    use super::{QuoteSet, RateProvider, Result};
    use async_trait::async_trait;
    use crate::error::{AppError, DomainError};

    /// A provider double that returns a fixed quote set, or a configured
    /// error, on every call.
    #[derive(Debug, Default)]
    pub struct StaticRateProvider {
        quotes: Mutex<Option<QuoteSet>>,
        fail: Mutex<bool>,
    }

    impl StaticRateProvider {
        #[must_use]
        pub fn new(quotes: QuoteSet) -> Self {
            Self {
                quotes: Mutex::new(Some(quotes)),
                fail: Mutex::new(false),
            }
        }

        #[must_use]
        pub fn failing() -> Self {
            Self {
                quotes: Mutex::new(None),
                fail: Mutex::new(true),
            }
        }
    }

    #[async_trait]
    impl RateProvider for StaticRateProvider {
        async fn fetch_quotes(&self, _base: &str) -> Result<QuoteSet> {
            if *self.fail.lock() {
                return Err(AppError::Domain(DomainError::UpstreamError(
                    "static provider configured to fail".into(),
                )));
            }
            Ok(self.quotes.lock().clone().unwrap_or_default())
        }
    }
}
