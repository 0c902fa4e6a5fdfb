//! Event bus port (§4.2, §6 bus topics).

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Event;

/// Port for publishing and consuming enriched/raw events over the bus.
///
/// The production adapter speaks NATS; tests substitute an in-memory mock.
#[async_trait]
pub trait Bus: Send + Sync {
    /// Publish a raw event to the `casino.events` subject.
    async fn publish_raw(&self, event: &Event) -> Result<()>;

    /// Publish an enriched event to the `casino.events.enriched` subject.
    async fn publish_enriched(&self, event: &Event) -> Result<()>;

    /// Subscribe to raw events, returning a channel of decoded [`Event`]s.
    async fn subscribe_raw(&self) -> Result<tokio::sync::mpsc::Receiver<Event>>;

    /// Whether the underlying connection currently reports itself connected
    /// (§4.9 health probe's "bus connectivity flag").
    fn is_connected(&self) -> bool;
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tokio::sync::mpsc;

    use super::{Bus, Event, Result};
    use async_trait::async_trait;

    /// In-memory bus double. Records every publish and lets tests pre-load
    /// a stream of raw events for `subscribe_raw`.
    #[derive(Debug, Default)]
    pub struct MockBus {
        pub raw_published: Arc<Mutex<Vec<Event>>>,
        pub enriched_published: Arc<Mutex<Vec<Event>>>,
        pub raw_feed: Arc<Mutex<Vec<Event>>>,
    }

    impl MockBus {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_feed(events: Vec<Event>) -> Self {
            Self {
                raw_feed: Arc::new(Mutex::new(events)),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Bus for MockBus {
        async fn publish_raw(&self, event: &Event) -> Result<()> {
            self.raw_published.lock().push(event.clone());
            Ok(())
        }

        async fn publish_enriched(&self, event: &Event) -> Result<()> {
            self.enriched_published.lock().push(event.clone());
            Ok(())
        }

        async fn subscribe_raw(&self) -> Result<mpsc::Receiver<Event>> {
            let (tx, rx) = mpsc::channel(64);
            let feed = std::mem::take(&mut *self.raw_feed.lock());
            tokio::spawn(async move {
                for event in feed {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            });
            Ok(rx)
        }

        fn is_connected(&self) -> bool {
            true
        }
    }
}
