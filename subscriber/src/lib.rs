//! Enrichment pipeline: rate cache, player lookup, description builder,
//! enricher chain, aggregator, materializer, health/metrics, and the
//! Postgres/NATS/HTTP adapters that wire them to the outside world.
//!
//! # Modules
//!
//! - [`rate_cache`] - two-tier exchange-rate cache (§4.1)
//! - [`store`] - `PostgreSQL` adapter for player lookup and rate storage (§4.2, §6)
//! - [`bus`] - NATS adapter for the raw/enriched topics (§6)
//! - [`enrich`] - the two-stage enricher chain (§4.4)
//! - [`aggregator`] - running totals and unique-player tracking (§4.5)
//! - [`materializer`] - moving average and leaderboards (§4.6)
//! - [`health`] - liveness probe (§4.9)
//! - [`metrics`] - Prometheus metric names (§4.9, §6)
//! - [`http`] - the four-route HTTP surface (§6)
//! - [`runtime`] - orchestrates everything above (§4.7)

pub mod aggregator;
pub mod bus;
pub mod enrich;
pub mod health;
pub mod http;
pub mod materializer;
pub mod metrics;
pub mod rate_cache;
pub mod runtime;
pub mod store;
