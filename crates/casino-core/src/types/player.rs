use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Player profile data relevant to enrichment.
///
/// A not-found player is represented by [`Player::default`] — the zero
/// value — never by `Option::None`; that distinction is §4.2's
/// responsibility, not this type's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub last_signed_in_at: Option<DateTime<Utc>>,
}
