//! `refresh-rates` CLI: optionally forces an upstream exchange-rate
//! refresh, then prints the `exchange_rates` table to stdout (§6).

use std::sync::Arc;

use casino_core::config::Settings;
use casino_core::ports::ExchangeRateStore;
use chrono::SecondsFormat;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use subscriber::rate_cache::{RateCache, ReqwestRateProvider};
use subscriber::store::PostgresStore;
use tracing_subscriber::EnvFilter;

/// Force a rate refresh and print the current `exchange_rates` table.
#[derive(Parser, Debug)]
#[command(name = "refresh-rates", author, version, about)]
struct Cli {
    /// Force an upstream refresh before printing the table.
    #[arg(long)]
    refresh: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url())
        .await?;
    let store = Arc::new(PostgresStore::new(pool));
    store.run_migrations().await?;

    if cli.refresh {
        let provider = Arc::new(ReqwestRateProvider::new(
            settings.exchange_rate_api_url.clone(),
            settings.exchange_rate_api_key.clone(),
        ));
        let cache = RateCache::new(
            settings.exchange_rate_source_currency.clone(),
            settings.memory_cache_duration(),
            store.clone(),
            provider,
        );
        cache.refresh().await?;
    }

    let rates = store.list_rates().await?;
    print_table(&rates);

    Ok(())
}

fn print_table(rates: &[casino_core::types::RateEntry]) {
    println!("{:<12} {:<16} {:<24}", "Currency", "Rate to EUR", "Last Updated");
    for rate in rates {
        println!(
            "{:<12} {:<16} {:<24}",
            rate.currency,
            rate.rate_to_base,
            rate.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }
}
