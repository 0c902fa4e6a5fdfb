//! Publisher binary: drives the synthetic event generator into the bus's
//! raw topic at a configured per-event delay (§4.8).
//!
//! Publish failures are logged and the event is dropped — there is no
//! retry, matching the source's fire-and-forget publisher loop (§7).

use std::sync::Arc;
use std::time::Duration;

use casino_core::config::Settings;
use casino_core::generator::{Generator, GeneratorConfig};
use casino_core::ports::SystemClock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const RAW_SUBJECT: &str = "casino.events";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let settings = Settings::load()?;

    info!(url = %settings.nats_url, "connecting to NATS");
    let client = async_nats::connect(&settings.nats_url).await?;

    let clock = Arc::new(SystemClock::new());
    let config = GeneratorConfig {
        delay: Duration::from_millis(settings.event_delay_ms),
        ..GeneratorConfig::default()
    };
    let generator = Arc::new(Generator::new(config, clock));

    let cancel = CancellationToken::new();
    let shutdown_token = cancel.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
        }
        info!("shutdown signal received");
        shutdown_token.cancel();
    });

    let mut events = generator.spawn(cancel.clone());
    info!(delay_ms = settings.event_delay_ms, "publisher started");

    while let Some(event) = events.recv().await {
        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, event_id = event.id, "failed to encode event, dropping");
                continue;
            }
        };

        if let Err(err) = client.publish(RAW_SUBJECT, payload.into()).await {
            error!(error = %err, event_id = event.id, "failed to publish event, dropping");
        }
    }

    info!("publisher stopped");
    Ok(())
}
