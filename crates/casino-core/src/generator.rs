//! Synthetic event generator (§4.8, publisher component).
//!
//! Produces a plausible, never-ending stream of raw [`Event`]s: weighted
//! towards bets, occasionally a deposit or a game start/stop pair, across a
//! bounded pool of player and game ids.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use rand::Rng;
use rand::seq::SliceRandom;
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::ports::Clock;
use crate::types::{Event, EventKind};

/// Tuning knobs for the generator. Defaults match the source's hardcoded
/// pool sizes and currency list.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub num_players: i64,
    pub num_games: i64,
    pub currencies: Vec<String>,
    pub delay: Duration,
    pub channel_capacity: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_players: 100,
            num_games: 20,
            currencies: vec![
                "EUR".into(),
                "USD".into(),
                "GBP".into(),
                "BTC".into(),
                "ETH".into(),
            ],
            delay: Duration::from_millis(1000),
            channel_capacity: 256,
        }
    }
}

/// Generates synthetic [`Event`]s on an interval, feeding them into a
/// bounded channel.
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    clock: Arc<dyn Clock>,
    next_id: AtomicI64,
}

impl Generator {
    #[must_use]
    pub fn new(config: GeneratorConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            next_id: AtomicI64::new(1),
        }
    }

    /// Spawn a background task emitting events every `delay` until
    /// `cancel` fires. Returns the receiving half of the channel.
    #[must_use]
    pub fn spawn(self: Arc<Self>, cancel: tokio_util::sync::CancellationToken) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.config.delay);
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        let event = self.next_event();
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });
        rx
    }

    /// Produce a single synthetic event. Exposed directly for tests that
    /// want deterministic, un-throttled generation.
    #[must_use]
    pub fn next_event(&self) -> Event {
        let mut rng = rand::thread_rng();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let player_id = rng.gen_range(1..=self.config.num_players);
        let game_id = rng.gen_range(1..=self.config.num_games);
        let currency = self
            .config
            .currencies
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| "EUR".to_string());

        let kind = weighted_kind(&mut rng);
        let amount = match kind {
            EventKind::GameStart | EventKind::GameStop => 0,
            EventKind::Bet => rng.gen_range(100..=10_000),
            EventKind::Deposit => rng.gen_range(1_000..=100_000),
        };
        let has_won = matches!(kind, EventKind::Bet) && rng.gen_bool(0.45);

        Event {
            id,
            player_id,
            game_id: if matches!(kind, EventKind::Deposit) { 0 } else { game_id },
            kind,
            amount,
            currency,
            has_won,
            created_at: self.clock.now(),
            amount_eur: 0.0,
            player: crate::types::Player::default(),
            description: String::new(),
        }
    }
}

fn weighted_kind(rng: &mut impl Rng) -> EventKind {
    match rng.gen_range(0..100) {
        0..=9 => EventKind::GameStart,
        10..=14 => EventKind::GameStop,
        15..=24 => EventKind::Deposit,
        _ => EventKind::Bet,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ports::FakeClock;

    #[test]
    fn next_event_assigns_increasing_ids() {
        let clock = Arc::new(FakeClock::epoch());
        let generator = Generator::new(GeneratorConfig::default(), clock);
        let first = generator.next_event();
        let second = generator.next_event();
        assert_eq!(second.id, first.id + 1);
    }

    #[test]
    fn deposit_events_have_no_game_id() {
        let clock = Arc::new(FakeClock::epoch());
        let config = GeneratorConfig {
            currencies: vec!["EUR".into()],
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(config, clock);
        for _ in 0..200 {
            let event = generator.next_event();
            if event.kind == EventKind::Deposit {
                assert_eq!(event.game_id, 0);
            }
        }
    }

    #[test]
    fn player_id_stays_within_pool() {
        let clock = Arc::new(FakeClock::epoch());
        let config = GeneratorConfig {
            num_players: 5,
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(config, clock);
        for _ in 0..200 {
            let event = generator.next_event();
            assert!(event.player_id >= 1 && event.player_id <= 5);
        }
    }
}
