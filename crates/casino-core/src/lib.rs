//! Domain types, ports, configuration and errors for the casino event
//! enrichment pipeline.
//!
//! This crate has no knowledge of NATS, Postgres, or HTTP — those are
//! adapters living in the `subscriber`, `publisher`, and `refresh-rates`
//! crates. It follows a hexagonal architecture:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          DOMAIN CORE                             │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐          │
//! │  │    types     │  │    ports     │  │    error     │          │
//! │  └──────────────┘  └──────┬───────┘  └──────────────┘          │
//! │                            │ traits only, no impls              │
//! └────────────────────────────┼──────────────────────────────────────┘
//!                              ▼
//!                  adapters live in downstream crates
//! ```
//!
//! # Modules
//!
//! - [`types`] - Event, Player, RateEntry, and in-memory analytics types
//! - [`error`] - Layered error types
//! - [`config`] - Configuration loading and validation
//! - [`ports`] - Port traits for dependency injection and testability
//! - [`generator`] - Synthetic event generator (demo source, see §1 scope note)

pub mod config;
pub mod error;
pub mod generator;
pub mod ports;
pub mod types;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version string.
#[must_use]
pub const fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
