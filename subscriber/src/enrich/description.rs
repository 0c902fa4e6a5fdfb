//! Stage 2: the description builder (§4.3).
//!
//! `describe()` is a pure function of an event and a game-title map — no
//! package-level title table (§9 Design Note (b): canonicalize on the
//! injected map).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use casino_core::error::Result;
use casino_core::types::{Event, EventKind};
use chrono::SecondsFormat;
use tokio_util::sync::CancellationToken;

use super::Enricher;

/// `game_id -> title` lookup injected at construction.
pub type GameTitles = HashMap<i64, String>;

/// Formats `event.description` (§4.3). Never fails in this implementation;
/// the `Result` in [`Enricher::enrich`] exists so the chain's stage-2
/// continue-on-error policy (§4.4) is exercised the same way regardless of
/// which concrete stage implementation is plugged in.
#[derive(Debug)]
pub struct DescriptionEnricher {
    games: Arc<GameTitles>,
}

impl DescriptionEnricher {
    #[must_use]
    pub const fn new(games: Arc<GameTitles>) -> Self {
        Self { games }
    }
}

#[async_trait]
impl Enricher for DescriptionEnricher {
    async fn enrich(&self, event: &mut Event, _cancel: &CancellationToken) -> Result<()> {
        event.description = describe(event, &self.games);
        Ok(())
    }
}

/// Pure formatter, exactly the five formats of §4.3.
///
/// `{amount}` divides the raw integer `amount` by 100 using integer
/// division *before* converting to a float, then renders with two
/// fraction digits — the same scaling factor for every currency,
/// regardless of its real number of decimals (§9 Open Question (a)). This
/// truncates a 1-satoshi BTC deposit (`amount == 1`) to `0.00`, preserved
/// intentionally rather than "fixed" to a per-currency decimal count.
#[must_use]
pub fn describe(event: &Event, games: &GameTitles) -> String {
    let title = games
        .get(&event.game_id)
        .cloned()
        .unwrap_or_else(|| format!("Game {}", event.game_id));
    let amount = (event.amount / 100) as f64;

    match event.kind {
        EventKind::GameStart => format!("Player {} started playing {title}", event.player_id),
        EventKind::GameStop => format!("Player {} stopped playing {title}", event.player_id),
        EventKind::Bet => {
            let verb = if event.has_won { "won" } else { "lost" };
            format!(
                "Player {} {verb} {} {amount:.2} in {title}",
                event.player_id, event.currency
            )
        }
        EventKind::Deposit => format!(
            "Player {} deposited {} {amount:.2} at {}",
            event.player_id,
            event.currency,
            event.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
    }
}
