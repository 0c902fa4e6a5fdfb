use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted exchange rate row.
///
/// `rate_to_base` is the multiplicative factor such that
/// `amount_in_base = amount_in_currency / rate_to_base` (§3). The base
/// currency is configured and defaults to EUR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub currency: String,
    pub rate_to_base: f64,
    pub updated_at: DateTime<Utc>,
}
