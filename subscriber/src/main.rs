//! Subscriber binary: loads settings, wires every adapter to the ports
//! the domain core defines, and runs the [`subscriber::runtime::Service`]
//! until a shutdown signal arrives (§4.7, §6).

use std::sync::Arc;

use casino_core::config::Settings;
use casino_core::ports::SystemClock;
use sqlx::postgres::PgPoolOptions;
use subscriber::aggregator::Aggregator;
use subscriber::bus::NatsBus;
use subscriber::enrich::{DescriptionEnricher, EnricherChain, PlayerRateEnricher};
use subscriber::health::HealthCheck;
use subscriber::materializer::Materializer;
use subscriber::rate_cache::{RateCache, ReqwestRateProvider};
use subscriber::runtime::Service;
use subscriber::store::PostgresStore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let settings = Settings::load()?;
    if let Err(errors) = settings.validate() {
        for err in &errors {
            error!(%err, "invalid configuration");
        }
        eyre::bail!("configuration validation failed: {}", errors.join("; "));
    }

    let metrics_handle = subscriber::metrics::install()?;

    info!("connecting to database");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&settings.database_url())
        .await?;
    let store = Arc::new(PostgresStore::new(pool));
    store.run_migrations().await?;

    info!("connecting to NATS");
    let bus: Arc<NatsBus> = Arc::new(NatsBus::connect(&settings.nats_url).await?);

    let rate_provider = Arc::new(ReqwestRateProvider::new(
        settings.exchange_rate_api_url.clone(),
        settings.exchange_rate_api_key.clone(),
    ));
    let rate_cache = Arc::new(RateCache::new(
        settings.exchange_rate_source_currency.clone(),
        settings.memory_cache_duration(),
        store.clone(),
        rate_provider,
    ));

    let stage1 = PlayerRateEnricher::new(
        rate_cache.clone(),
        store.clone(),
        settings.exchange_rate_source_currency.clone(),
    );
    let stage2 = DescriptionEnricher::new(Arc::new(default_game_titles()));
    let chain = Arc::new(EnricherChain::new(stage1, stage2));

    let aggregator = Arc::new(Aggregator::new());
    let materializer = Arc::new(Materializer::new(Arc::new(SystemClock::new())));
    let health = Arc::new(HealthCheck::new(store.clone(), bus.clone()));

    let service = Arc::new(Service::new(
        bus,
        chain,
        aggregator,
        materializer,
        rate_cache,
        health,
        metrics_handle,
        settings.http_port,
        settings.refresh_interval(),
    ));

    let cancel = CancellationToken::new();
    let shutdown_token = cancel.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("shutdown signal received");
        shutdown_token.cancel();
    });

    service.run(cancel).await?;
    info!("subscriber stopped");
    Ok(())
}

/// Fixed `game_id -> title` seed table. The source keeps this catalog as a
/// package-level map; here it's built once at startup and injected into
/// the description stage rather than reached for globally (§9 Design Note
/// (b)).
fn default_game_titles() -> subscriber::enrich::GameTitles {
    [
        (100, "Book of Dead"),
        (101, "Starburst"),
        (102, "Gonzo's Quest"),
        (103, "Blackjack Classic"),
        (104, "European Roulette"),
    ]
    .into_iter()
    .map(|(id, title)| (id, title.to_string()))
    .collect()
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => error!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
