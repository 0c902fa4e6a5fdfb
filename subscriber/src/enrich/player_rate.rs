//! Stage 1: player lookup + rate conversion (§4.1, §4.2, §4.4).

use std::sync::Arc;

use async_trait::async_trait;
use casino_core::error::{AppError, DomainError, Result};
use casino_core::ports::PlayerStore;
use casino_core::types::Event;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::Enricher;
use crate::rate_cache::RateCache;

/// Sets `amount_eur` via the rate cache and `player` via the player store.
///
/// A *not-found* player is not an error (§4.2) — the event keeps a
/// zero-valued [`Player`](casino_core::types::Player). A `RateUnavailable`
/// or store failure is surfaced as `Err`, which the chain treats as a
/// stage-1 abort (§4.4).
#[derive(Debug)]
pub struct PlayerRateEnricher {
    rate_cache: Arc<RateCache>,
    player_store: Arc<dyn PlayerStore>,
    base_currency: String,
}

impl PlayerRateEnricher {
    #[must_use]
    pub fn new(
        rate_cache: Arc<RateCache>,
        player_store: Arc<dyn PlayerStore>,
        base_currency: String,
    ) -> Self {
        Self {
            rate_cache,
            player_store,
            base_currency,
        }
    }
}

#[async_trait]
impl Enricher for PlayerRateEnricher {
    #[instrument(skip_all, fields(event_id = event.id, currency = %event.currency))]
    async fn enrich(&self, event: &mut Event, _cancel: &CancellationToken) -> Result<()> {
        event.amount_eur = if event.is_base_currency(&self.base_currency) {
            // I1: amount_eur == amount when currency is the base.
            event.amount as f64
        } else {
            let rate = self.rate_cache.get_rate(&event.currency).await?;
            event.amount as f64 / rate
        };

        match self.player_store.get_player(event.player_id).await {
            Ok(Some(player)) => event.player = player,
            Ok(None) => {
                // Not found: zero-valued player, not an error (§4.2).
            }
            Err(source) => {
                return Err(AppError::Domain(DomainError::PlayerLookupError {
                    player_id: event.player_id,
                    source: Box::new(source),
                }));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;

    use casino_core::ports::player_store::mocks::MockPlayerStore;
    use casino_core::ports::rate_provider::mocks::StaticRateProvider;
    use casino_core::ports::rate_store::mocks::MockRateStore;
    use casino_core::types::{EventKind, Player};
    use chrono::Utc;

    use super::*;

    fn base_event(currency: &str, amount: i64) -> Event {
        Event {
            id: 1,
            player_id: 123,
            game_id: 100,
            kind: EventKind::Bet,
            amount,
            currency: currency.to_string(),
            has_won: true,
            created_at: Utc::now(),
            amount_eur: 0.0,
            player: Player::default(),
            description: String::new(),
        }
    }

    fn enricher(rates: HashMap<String, f64>, players: HashMap<i64, Player>) -> PlayerRateEnricher {
        let store = Arc::new(MockRateStore::new());
        let provider = Arc::new(StaticRateProvider::new(rates));
        let cache = Arc::new(RateCache::new(
            "EUR".to_string(),
            std::time::Duration::from_secs(60),
            store,
            provider,
        ));
        PlayerRateEnricher::new(
            cache,
            Arc::new(MockPlayerStore::with_players(players)),
            "EUR".to_string(),
        )
    }

    #[tokio::test]
    async fn base_currency_copies_amount_verbatim() {
        let enricher = enricher(HashMap::new(), HashMap::new());
        let mut event = base_event("EUR", 500);
        let cancel = CancellationToken::new();
        enricher.enrich(&mut event, &cancel).await.unwrap();
        assert!((event.amount_eur - 500.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn non_base_currency_divides_by_rate() {
        let mut rates = HashMap::new();
        rates.insert("USD".to_string(), 1.0989);
        let enricher = enricher(rates, HashMap::new());
        let mut event = base_event("USD", 1000);
        let cancel = CancellationToken::new();
        enricher.enrich(&mut event, &cancel).await.unwrap();
        assert!((event.amount_eur - 1000.0 / 1.0989).abs() < 1e-9);
    }

    #[tokio::test]
    async fn missing_player_is_not_an_error() {
        let enricher = enricher(HashMap::new(), HashMap::new());
        let mut event = base_event("EUR", 500);
        let cancel = CancellationToken::new();
        enricher.enrich(&mut event, &cancel).await.unwrap();
        assert_eq!(event.player, Player::default());
    }

    #[tokio::test]
    async fn found_player_is_attached() {
        let mut players = HashMap::new();
        players.insert(
            123,
            Player {
                email: "a@b.com".into(),
                last_signed_in_at: None,
            },
        );
        let enricher = enricher(HashMap::new(), players);
        let mut event = base_event("EUR", 500);
        let cancel = CancellationToken::new();
        enricher.enrich(&mut event, &cancel).await.unwrap();
        assert_eq!(event.player.email, "a@b.com");
    }

    #[tokio::test]
    async fn rate_unavailable_aborts_stage() {
        let enricher = enricher(HashMap::new(), HashMap::new());
        let mut event = base_event("XRP", 500);
        let cancel = CancellationToken::new();
        let err = enricher.enrich(&mut event, &cancel).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::RateUnavailable(_))
        ));
    }
}
