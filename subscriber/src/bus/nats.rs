//! `async-nats` implementation of the [`Bus`] port.
//!
//! Grounded on the teacher's `IggyPublisher` (lazy connect, atomic
//! connection flag) but simplified: `async-nats`'s client already manages
//! reconnection internally, so there is no separate init-guard — connect
//! once in `new`, store the client, and read its live connection state for
//! the health check.

use async_trait::async_trait;
use casino_core::error::{InfraError, Result};
use casino_core::ports::Bus;
use casino_core::types::Event;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::{ENRICHED_SUBJECT, RAW_SUBJECT};

/// NATS-backed [`Bus`]: one shared, concurrency-safe connection used by
/// both the publish and subscribe sides (§5 "the bus connection is
/// shared; the client library must be concurrency-safe for publish").
#[derive(Debug, Clone)]
pub struct NatsBus {
    client: async_nats::Client,
}

impl NatsBus {
    /// Connect to `url` (§6 `NATS_URL`).
    ///
    /// # Errors
    /// Returns an error if the initial connection fails. Connection
    /// failure here is startup-fatal (§7).
    #[instrument]
    pub async fn connect(url: &str) -> Result<Self> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| InfraError::Bus(Box::new(e)))?;
        info!(%url, "connected to NATS");
        Ok(Self { client })
    }

    async fn publish(&self, subject: &str, event: &Event) -> Result<()> {
        let payload = serde_json::to_vec(event).map_err(InfraError::Serialization)?;
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| InfraError::Bus(Box::new(e)))?;
        Ok(())
    }
}

#[async_trait]
impl Bus for NatsBus {
    #[instrument(skip(self, event), fields(event_id = event.id))]
    async fn publish_raw(&self, event: &Event) -> Result<()> {
        self.publish(RAW_SUBJECT, event).await
    }

    #[instrument(skip(self, event), fields(event_id = event.id))]
    async fn publish_enriched(&self, event: &Event) -> Result<()> {
        self.publish(ENRICHED_SUBJECT, event).await
    }

    /// JSON-decodes each raw message in a spawned task before handing the
    /// event to the channel, so `events_processed_total` and the decode
    /// side of `enrichment_errors_total` are incremented here rather than
    /// alongside the rest of the per-event bookkeeping in
    /// `runtime.rs::process_one` (§4.7 steps 1-2 run in this adapter; steps
    /// 3-6 run in the core dispatch loop).
    #[instrument(skip(self))]
    async fn subscribe_raw(&self) -> Result<mpsc::Receiver<Event>> {
        use futures_util::StreamExt;

        let mut subscriber = self
            .client
            .subscribe(RAW_SUBJECT.to_string())
            .await
            .map_err(|e| InfraError::Bus(Box::new(e)))?;

        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(async move {
            while let Some(message) = subscriber.next().await {
                crate::metrics::events_processed_total();
                match serde_json::from_slice::<Event>(&message.payload) {
                    Ok(event) => {
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        // §4.7 step 2: malformed raw payload, drop + count (§7).
                        warn!(error = %err, "dropping malformed raw payload");
                        crate::metrics::enrichment_errors_total();
                    }
                }
            }
            debug!("raw subscription stream ended");
        });

        Ok(rx)
    }

    /// Whether the underlying connection currently reports itself
    /// connected (§4.9 health probe's "bus connectivity flag").
    fn is_connected(&self) -> bool {
        matches!(
            self.client.connection_state(),
            async_nats::connection::State::Connected
        )
    }
}

#[allow(dead_code)]
fn _assert_send_sync() {
    fn check<T: Send + Sync>() {}
    check::<NatsBus>();
}
