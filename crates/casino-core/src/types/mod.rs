//! Canonical domain types shared by every stage of the enrichment pipeline.

mod event;
mod player;
mod rate;
mod stats;

pub use event::{Event, EventKind};
pub use player::Player;
pub use rate::RateEntry;
pub use stats::{PlayerStats, TopPlayer};
