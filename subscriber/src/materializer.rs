//! The moving-average + leaderboard materializer (§4.6).

use std::collections::HashMap;
use std::sync::Arc;

use casino_core::ports::Clock;
use casino_core::types::{Event, EventKind, PlayerStats, TopPlayer};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Fixed ring length: one slot per processed event in recency order (§3).
const RING_SIZE: usize = 60;

/// A consistent, shallow-copied view of the materializer's state (§4.6).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterializedSnapshot {
    pub events_total: u64,
    pub events_per_minute: f64,
    pub events_per_second_moving_average: f64,
    pub top_player_bets: TopPlayer,
    pub top_player_wins: TopPlayer,
    pub top_player_deposits: TopPlayer,
}

struct State {
    events_total: u64,
    ring: [Option<DateTime<Utc>>; RING_SIZE],
    cursor: usize,
    player_stats: HashMap<i64, PlayerStats>,
}

/// Maintains a 60-slot arrival-time ring and per-player running stats,
/// serving consistent snapshot reads while continuously updated (§4.6, I4).
pub struct Materializer {
    clock: Arc<dyn Clock>,
    started_at: DateTime<Utc>,
    state: RwLock<State>,
}

impl std::fmt::Debug for Materializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materializer")
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

impl Materializer {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let started_at = clock.now();
        Self {
            clock,
            started_at,
            state: RwLock::new(State {
                events_total: 0,
                ring: [None; RING_SIZE],
                cursor: 0,
                player_stats: HashMap::new(),
            }),
        }
    }

    /// Feed one enriched event into the materializer (§4.7 step 5).
    pub fn record(&self, event: &Event) {
        let now = self.clock.now();
        let mut state = self.state.write();

        state.events_total += 1;
        let cursor = state.cursor;
        state.ring[cursor] = Some(now);
        state.cursor = (cursor + 1) % RING_SIZE;

        let stats = state.player_stats.entry(event.player_id).or_default();
        match event.kind {
            EventKind::Bet => {
                stats.bet_total += event.amount_eur;
                if event.has_won {
                    stats.win_count += 1;
                    stats.win_total += event.amount_eur;
                }
            }
            EventKind::Deposit => {
                stats.deposit_total += event.amount_eur as i64;
            }
            EventKind::GameStart | EventKind::GameStop => {}
        }
    }

    /// A consistent snapshot over all known player stats at some recent
    /// instant (I4: no torn reads — everything below is computed under one
    /// read-lock acquisition).
    #[must_use]
    pub fn get_data(&self) -> MaterializedSnapshot {
        let now = self.clock.now();
        let state = self.state.read();

        let elapsed_minutes = (now - self.started_at).num_milliseconds() as f64 / 60_000.0;
        let events_per_minute = if elapsed_minutes > 0.0 {
            state.events_total as f64 / elapsed_minutes
        } else {
            0.0
        };

        let one_minute_ago = now - chrono::Duration::minutes(1);
        let recent = state
            .ring
            .iter()
            .filter(|slot| slot.is_some_and(|t| t > one_minute_ago))
            .count();
        let events_per_second_moving_average = recent as f64 / RING_SIZE as f64;

        let (top_player_bets, top_player_wins, top_player_deposits) = leaderboards(&state.player_stats);

        MaterializedSnapshot {
            events_total: state.events_total,
            events_per_minute,
            events_per_second_moving_average,
            top_player_bets,
            top_player_wins,
            top_player_deposits,
        }
    }
}

/// Full scan of player stats for the three leaderboards (§4.6). Ties are
/// broken by `HashMap` iteration order, deliberately unspecified — tests
/// must not assume a tie-break (§4.6, §9 Open Question (c)).
///
/// Comparisons truncate `bet_total`/`win_total` to `i64` before comparing,
/// preserving the source's `int64(stats.BetTotal)` truncation exactly.
fn leaderboards(stats: &HashMap<i64, PlayerStats>) -> (TopPlayer, TopPlayer, TopPlayer) {
    let mut top_bets = TopPlayer::default();
    let mut top_wins = TopPlayer::default();
    let mut top_deposits = TopPlayer::default();

    for (&player_id, stat) in stats {
        let bet_total = stat.bet_total as i64;
        if bet_total > top_bets.count {
            top_bets = TopPlayer {
                id: player_id,
                count: bet_total,
            };
        }

        let win_total = stat.win_total as i64;
        if win_total > top_wins.count {
            top_wins = TopPlayer {
                id: player_id,
                count: win_total,
            };
        }

        if stat.deposit_total > top_deposits.count {
            top_deposits = TopPlayer {
                id: player_id,
                count: stat.deposit_total,
            };
        }
    }

    (top_bets, top_wins, top_deposits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use casino_core::ports::FakeClock;
    use casino_core::types::Player;
    use chrono::Utc;

    use super::*;

    fn event(player_id: i64, kind: EventKind, amount_eur: f64, has_won: bool) -> Event {
        Event {
            id: 1,
            player_id,
            game_id: 0,
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
    fn events_total_counts_every_record() {
        let clock = Arc::new(FakeClock::epoch());
        let materializer = Materializer::new(clock);
        for _ in 0..4 {
            materializer.record(&event(1, EventKind::Bet, 10.0, false));
        }
        assert_eq!(materializer.get_data().events_total, 4);
    }

    #[test]
    fn single_event_moving_average_is_one_sixtieth() {
        let clock = Arc::new(FakeClock::epoch());
        materializer_single_event_assertions(clock);
    }

    fn materializer_single_event_assertions(clock: Arc<FakeClock>) {
        let materializer = Materializer::new(clock.clone());
        materializer.record(&event(1, EventKind::Bet, 10.0, false));

        let snapshot = materializer.get_data();
        assert!((snapshot.events_per_second_moving_average - 1.0 / 60.0).abs() < 1e-9);

        clock.advance(chrono::Duration::seconds(61));
        let snapshot = materializer.get_data();
        assert_eq!(snapshot.events_per_second_moving_average, 0.0);
    }

    #[test]
    fn leaderboard_matches_scenario_6() {
        let clock = Arc::new(FakeClock::epoch());
        let materializer = Materializer::new(clock);

        materializer.record(&event(1, EventKind::Bet, 100.0, true));
        materializer.record(&event(1, EventKind::Bet, 100.0, false));
        materializer.record(&event(2, EventKind::Deposit, 1000.0, false));
        materializer.record(&event(2, EventKind::Bet, 100.0, true));

        let snapshot = materializer.get_data();
        assert_eq!(snapshot.top_player_bets, TopPlayer { id: 1, count: 200 });
        assert_eq!(snapshot.top_player_wins, TopPlayer { id: 1, count: 100 });
        assert_eq!(
            snapshot.top_player_deposits,
            TopPlayer { id: 2, count: 1000 }
        );
    }

    #[test]
    fn get_data_is_idempotent_with_no_intervening_events() {
        let clock = Arc::new(FakeClock::epoch());
        let materializer = Materializer::new(clock);
        materializer.record(&event(1, EventKind::Bet, 10.0, true));
        assert_eq!(materializer.get_data(), materializer.get_data());
    }
}
