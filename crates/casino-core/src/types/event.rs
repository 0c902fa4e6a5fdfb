use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::player::Player;

/// The closed set of event kinds the pipeline understands.
///
/// Unknown values fail to deserialize rather than silently falling back to
/// a default — a malformed raw payload is handled by the subscriber runtime
/// (§4.7 step 2), not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    GameStart,
    Bet,
    Deposit,
    GameStop,
}

/// A single structured casino gameplay event.
///
/// Raw events (as produced by the generator) leave `amount_eur`, `player`,
/// and `description` zero-valued; the enricher chain fills them in. Events
/// are immutable once they have left the chain (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub player_id: i64,

    /// Undefined (zero) for `deposit` events.
    #[serde(default)]
    pub game_id: i64,

    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Smallest indivisible unit of `currency` (e.g. 300 = 3.00 EUR).
    /// Only meaningful for `bet` and `deposit`.
    #[serde(default)]
    pub amount: i64,

    /// ISO currency code. Only meaningful for `bet` and `deposit`.
    #[serde(default)]
    pub currency: String,

    /// Meaningful only for `bet`.
    #[serde(default)]
    pub has_won: bool,

    pub created_at: DateTime<Utc>,

    /// Set by stage 1 of the enricher chain.
    #[serde(default)]
    pub amount_eur: f64,

    /// Set by stage 1 of the enricher chain. A not-found player leaves this
    /// at its zero value; that is not an error (§4.2).
    #[serde(default)]
    pub player: Player,

    /// Set by stage 2 of the enricher chain.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Event {
    /// Whether `currency` is the configured base currency.
    #[must_use]
    pub fn is_base_currency(&self, base: &str) -> bool {
        self.currency.eq_ignore_ascii_case(base)
    }
}
