//! Running totals and unique-player tracking (§4.5).

use std::collections::{HashMap, HashSet};

use casino_core::types::{Event, EventKind};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A true snapshot of the aggregator's state at some recent instant.
///
/// §9 Open Question (d): the source's `GetAggregates()` allocates fresh
/// empty `UniqueUsers`/`ActiveGames` maps instead of copying them — called
/// out in spec.md as "almost certainly a bug". This snapshot clones both
/// collections instead, satisfying I4 and P7.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub total_bets: i64,
    pub total_wins: i64,
    pub total_deposits: i64,
    pub unique_players: HashSet<i64>,
    pub active_games: HashMap<i64, i64>,
}

#[derive(Debug, Default)]
struct State {
    total_bets: i64,
    total_wins: i64,
    total_deposits: i64,
    unique_players: HashSet<i64>,
    active_games: HashMap<i64, i64>,
}

/// Mutex-guarded running totals over the lifetime of the process (§4.5).
///
/// A single lock protects every field — reads and writes are cheap and
/// frequent enough that splitting it further buys nothing (same rationale
/// as the rate cache's single lock, §4.1).
#[derive(Debug, Default)]
pub struct Aggregator {
    state: Mutex<State>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one enriched event into the running totals (§4.5, §4.7 step 5).
    ///
    /// Bet/win totals are integer-truncated from `amount_eur` per §4.5
    /// ("total bets (base units, integer-truncated from `amount_eur`)").
    /// `ActiveGames` is incremented on `game_start` and decremented (floor
    /// zero, I5/P5) on `game_stop`.
    pub fn record(&self, event: &Event) {
        let mut state = self.state.lock();
        state.unique_players.insert(event.player_id);

        match event.kind {
            EventKind::Bet => {
                state.total_bets += event.amount_eur as i64;
                if event.has_won {
                    state.total_wins += event.amount_eur as i64;
                }
            }
            EventKind::Deposit => {
                state.total_deposits += event.amount_eur as i64;
            }
            EventKind::GameStart => {
                *state.active_games.entry(event.game_id).or_insert(0) += 1;
            }
            EventKind::GameStop => {
                if let Some(count) = state.active_games.get_mut(&event.game_id) {
                    *count = (*count - 1).max(0);
                }
            }
        }
    }

    /// A true, deep-copied snapshot of the current state (I4, P7).
    #[must_use]
    pub fn snapshot(&self) -> AggregateSnapshot {
        let state = self.state.lock();
        AggregateSnapshot {
            total_bets: state.total_bets,
            total_wins: state.total_wins,
            total_deposits: state.total_deposits,
            unique_players: state.unique_players.clone(),
            active_games: state.active_games.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use casino_core::types::Player;
    use chrono::Utc;

    use super::*;

    fn event(kind: EventKind, player_id: i64, game_id: i64, amount_eur: f64, has_won: bool) -> Event {
        Event {
            id: 1,
            player_id,
            game_id,
            kind,
            amount: 0,
            currency: "EUR".into(),
            has_won,
            created_at: Utc::now(),
            amount_eur,
            player: Player::default(),
            description: String::new(),
        }
    }

    #[test]
    fn tracks_unique_players_monotonically() {
        let aggregator = Aggregator::new();
        aggregator.record(&event(EventKind::Bet, 1, 0, 100.0, false));
        aggregator.record(&event(EventKind::Bet, 1, 0, 50.0, false));
        aggregator.record(&event(EventKind::Bet, 2, 0, 50.0, false));
        let snapshot = aggregator.snapshot();
        assert_eq!(snapshot.unique_players.len(), 2);
    }

    #[test]
    fn credits_wins_only_when_has_won() {
        let aggregator = Aggregator::new();
        aggregator.record(&event(EventKind::Bet, 1, 0, 100.0, true));
        aggregator.record(&event(EventKind::Bet, 1, 0, 50.0, false));
        let snapshot = aggregator.snapshot();
        assert_eq!(snapshot.total_bets, 150);
        assert_eq!(snapshot.total_wins, 100);
    }

    #[test]
    fn deposit_total_accumulates() {
        let aggregator = Aggregator::new();
        aggregator.record(&event(EventKind::Deposit, 1, 0, 1000.0, false));
        aggregator.record(&event(EventKind::Deposit, 1, 0, 500.0, false));
        assert_eq!(aggregator.snapshot().total_deposits, 1500);
    }

    #[test]
    fn active_games_increments_and_decrements() {
        let aggregator = Aggregator::new();
        aggregator.record(&event(EventKind::GameStart, 1, 7, 0.0, false));
        aggregator.record(&event(EventKind::GameStart, 2, 7, 0.0, false));
        assert_eq!(aggregator.snapshot().active_games[&7], 2);

        aggregator.record(&event(EventKind::GameStop, 1, 7, 0.0, false));
        assert_eq!(aggregator.snapshot().active_games[&7], 1);
    }

    #[test]
    fn active_games_never_goes_negative() {
        let aggregator = Aggregator::new();
        aggregator.record(&event(EventKind::GameStop, 1, 7, 0.0, false));
        assert_eq!(aggregator.snapshot().active_games[&7], 0);
    }

    #[test]
    fn snapshot_is_idempotent_with_no_intervening_events() {
        let aggregator = Aggregator::new();
        aggregator.record(&event(EventKind::Bet, 1, 0, 100.0, true));
        assert_eq!(aggregator.snapshot(), aggregator.snapshot());
    }
}
