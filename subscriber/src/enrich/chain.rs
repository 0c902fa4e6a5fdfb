//! The two-stage chain itself (§4.4).

use casino_core::types::Event;
use tokio_util::sync::CancellationToken;
use tracing::{instrument, warn};

use super::{DescriptionEnricher, Enricher, PlayerRateEnricher};

/// Result of running the chain over one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichOutcome {
    /// Both stages ran (stage 2 may have failed) — republish (§4.4).
    Enriched,
    /// Stage 1 aborted — do not republish (§4.4, I2).
    Aborted,
}

/// Explicit two-stage chain, constructed once at startup from concrete
/// ports (§9 Design Note (a): no runtime downcasting).
#[derive(Debug)]
pub struct EnricherChain {
    stage1: PlayerRateEnricher,
    stage2: DescriptionEnricher,
}

impl EnricherChain {
    #[must_use]
    pub const fn new(stage1: PlayerRateEnricher, stage2: DescriptionEnricher) -> Self {
        Self { stage1, stage2 }
    }

    /// Run both stages in order (O1: stage 1 strictly before stage 2).
    #[instrument(skip_all, fields(event_id = event.id))]
    pub async fn run(&self, event: &mut Event, cancel: &CancellationToken) -> EnrichOutcome {
        if let Err(err) = self.stage1.enrich(event, cancel).await {
            warn!(event_id = event.id, error = %err, "stage 1 enrichment aborted, dropping event");
            return EnrichOutcome::Aborted;
        }

        if let Err(err) = self.stage2.enrich(event, cancel).await {
            warn!(event_id = event.id, error = %err, "description stage failed, continuing");
        }

        EnrichOutcome::Enriched
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use casino_core::ports::player_store::mocks::MockPlayerStore;
    use casino_core::ports::rate_provider::mocks::StaticRateProvider;
    use casino_core::ports::rate_store::mocks::MockRateStore;
    use casino_core::types::{EventKind, Player};
    use chrono::Utc;

    use super::*;
    use crate::rate_cache::RateCache;

    fn chain(rates: HashMap<String, f64>) -> EnricherChain {
        let store = Arc::new(MockRateStore::new());
        let provider = Arc::new(StaticRateProvider::new(rates));
        let cache = Arc::new(RateCache::new(
            "EUR".to_string(),
            std::time::Duration::from_secs(60),
            store,
            provider,
        ));
        let stage1 = PlayerRateEnricher::new(
            cache,
            Arc::new(MockPlayerStore::new()),
            "EUR".to_string(),
        );
        let mut games = HashMap::new();
        games.insert(1, "Book of Dead".to_string());
        let stage2 = DescriptionEnricher::new(Arc::new(games));
        EnricherChain::new(stage1, stage2)
    }

    fn event() -> Event {
        Event {
            id: 1,
            player_id: 1,
            game_id: 1,
            kind: EventKind::Bet,
            amount: 100,
            currency: "EUR".into(),
            has_won: true,
            created_at: Utc::now(),
            amount_eur: 0.0,
            player: Player::default(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn successful_chain_produces_description_and_amount_eur() {
        let chain = chain(HashMap::new());
        let mut event = event();
        let cancel = CancellationToken::new();
        let outcome = chain.run(&mut event, &cancel).await;
        assert_eq!(outcome, EnrichOutcome::Enriched);
        assert!(!event.description.is_empty());
        assert!((event.amount_eur - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn stage1_failure_aborts_before_description_runs() {
        let chain = chain(HashMap::new());
        let mut event = event();
        event.currency = "XRP".into(); // unknown, not base, no rate seeded
        let cancel = CancellationToken::new();
        let outcome = chain.run(&mut event, &cancel).await;
        assert_eq!(outcome, EnrichOutcome::Aborted);
        assert!(event.description.is_empty());
    }
}
