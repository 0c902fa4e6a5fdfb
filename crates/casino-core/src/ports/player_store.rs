//! Player lookup port (§4.1 player enrichment, §6 `players` table).

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Player;

/// Port for looking up player metadata by id.
///
/// A missing player is `Ok(None)`, never an error — only a store failure
/// (connection lost, query error) is `Err` (§7).
#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn get_player(&self, player_id: i64) -> Result<Option<Player>>;
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks {
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use super::{PlayerStore, Player, Result};
    use async_trait::async_trait;

    /// In-memory player store double.
    #[derive(Debug, Default)]
    pub struct MockPlayerStore {
        players: Mutex<HashMap<i64, Player>>,
    }

    impl MockPlayerStore {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_players(players: HashMap<i64, Player>) -> Self {
            Self {
                players: Mutex::new(players),
            }
        }

        pub fn insert(&self, player_id: i64, player: Player) {
            self.players.lock().insert(player_id, player);
        }
    }

    #[async_trait]
    impl PlayerStore for MockPlayerStore {
        async fn get_player(&self, player_id: i64) -> Result<Option<Player>> {
            Ok(self.players.lock().get(&player_id).cloned())
        }
    }
}
