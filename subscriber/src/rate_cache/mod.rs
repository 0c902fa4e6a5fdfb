//! Two-tier exchange rate cache (§4.1): memory, then store, then upstream.

mod cache;
mod http_provider;

pub use cache::RateCache;
pub use http_provider::ReqwestRateProvider;
