//! NATS-backed [`Bus`](casino_core::ports::Bus) adapter (§6 bus topics).

mod nats;

pub use nats::NatsBus;

/// Raw event subject (§6).
pub const RAW_SUBJECT: &str = "casino.events";

/// Enriched event subject (§6).
pub const ENRICHED_SUBJECT: &str = "casino.events.enriched";
