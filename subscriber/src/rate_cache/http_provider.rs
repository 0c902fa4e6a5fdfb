//! HTTP adapter for the upstream exchange-rate API (§4.1 upstream tier).

use async_trait::async_trait;
use casino_core::error::{AppError, DomainError, Result};
use casino_core::ports::rate_provider::QuoteSet;
use casino_core::ports::RateProvider;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Upstream API response shape (mirrors the source's `exchangerate`-style
/// quote API).
#[derive(Debug, Deserialize)]
struct ApiResponse {
    success: bool,
    #[serde(default)]
    source: String,
    #[serde(default)]
    quotes: QuoteSet,
}

/// `reqwest`-backed [`RateProvider`] hitting a configured quote API.
#[derive(Debug, Clone)]
pub struct ReqwestRateProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ReqwestRateProvider {
    #[must_use]
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }
}

#[async_trait]
impl RateProvider for ReqwestRateProvider {
    #[instrument(skip(self))]
    async fn fetch_quotes(&self, base: &str) -> Result<QuoteSet> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("access_key", self.api_key.as_str()), ("source", base)])
            .send()
            .await
            .map_err(|e| AppError::Domain(DomainError::UpstreamError(e.to_string())))?;

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Domain(DomainError::DecodeError(e.to_string())))?;

        if !body.success {
            return Err(AppError::Domain(DomainError::ProviderError));
        }

        debug!(source = %body.source, quotes = body.quotes.len(), "fetched upstream quotes");

        // Quote keys are prefixed with the source currency (e.g. "EURUSD");
        // strip it so downstream code deals in bare ISO codes.
        let stripped = body
            .quotes
            .into_iter()
            .map(|(key, value)| {
                let currency = key.strip_prefix(base).unwrap_or(&key).to_string();
                (currency, value)
            })
            .collect();

        Ok(stripped)
    }
}
