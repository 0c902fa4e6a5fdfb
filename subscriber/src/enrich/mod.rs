//! The enricher chain (§4.4): an ordered, two-stage pipeline with
//! short-circuit-on-critical semantics.
//!
//! Stage 1 ([`PlayerRateEnricher`]) sets `amount_eur` and the player
//! profile; a failure there aborts the event (§4.4, I2). Stage 2
//! ([`DescriptionEnricher`]) sets the human-readable description; a
//! failure there is logged and counted but never aborts (§4.4, §7).

mod chain;
mod description;
mod player_rate;

pub use chain::{EnrichOutcome, EnricherChain};
pub use description::{DescriptionEnricher, GameTitles, describe};
pub use player_rate::PlayerRateEnricher;

use async_trait::async_trait;
use casino_core::error::Result;
use casino_core::types::Event;
use tokio_util::sync::CancellationToken;

/// A single stage in the enricher chain (§4.4).
///
/// Implementations must be side-effect-free beyond mutating `event` and
/// must honor `cancel` at any blocking suspension point they introduce
/// (§5 "Suspension points").
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Enrich `event` in place.
    ///
    /// # Errors
    /// Returns an error describing why this stage could not complete. The
    /// chain, not the enricher, decides whether that error aborts the
    /// event (§4.4).
    async fn enrich(&self, event: &mut Event, cancel: &CancellationToken) -> Result<()>;
}
