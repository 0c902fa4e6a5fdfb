use serde::{Deserialize, Serialize};

/// Per-player running totals maintained by the materializer (§3, §4.6).
///
/// Amounts are tracked in base-currency units (EUR by default), matching
/// the enriched event's `amount_eur`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub bet_total: f64,
    pub win_count: i64,
    pub win_total: f64,
    pub deposit_total: i64,
}

/// A single `(player_id, count)` leaderboard entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TopPlayer {
    pub id: i64,
    pub count: i64,
}
