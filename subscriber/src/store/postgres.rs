//! `PostgreSQL` implementation of the player and rate store ports.

use async_trait::async_trait;
use casino_core::error::{InfraError, Result};
use casino_core::ports::{ExchangeRateStore, PlayerStore};
use casino_core::types::{Player, RateEntry};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

/// `PostgreSQL`-based store, implementing both `PlayerStore` and
/// `ExchangeRateStore` against the `players` and `exchange_rates` tables.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending migrations bundled under `subscriber/migrations`.
    ///
    /// # Errors
    /// Returns an error if the migration runner fails.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| InfraError::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Cheap connectivity probe used by the health check (§4.7).
    ///
    /// # Errors
    /// Returns an error if the query cannot complete.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(InfraError::Database)?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlayerRow {
    email: String,
    last_signed_in_at: Option<DateTime<Utc>>,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Self {
            email: row.email,
            last_signed_in_at: row.last_signed_in_at,
        }
    }
}

#[async_trait]
impl PlayerStore for PostgresStore {
    #[instrument(skip(self))]
    async fn get_player(&self, player_id: i64) -> Result<Option<Player>> {
        let row = sqlx::query_as::<_, PlayerRow>(
            "SELECT email, last_signed_in_at FROM players WHERE id = $1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(InfraError::Database)?;

        Ok(row.map(Into::into))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RateRow {
    currency: String,
    rate_to_eur: f64,
    updated_at: DateTime<Utc>,
}

impl From<RateRow> for RateEntry {
    fn from(row: RateRow) -> Self {
        Self {
            currency: row.currency,
            rate_to_base: row.rate_to_eur,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ExchangeRateStore for PostgresStore {
    #[instrument(skip(self))]
    async fn get_rate(&self, currency: &str) -> Result<Option<RateEntry>> {
        let row = sqlx::query_as::<_, RateRow>(
            "SELECT currency, rate_to_eur, updated_at FROM exchange_rates WHERE currency = $1",
        )
        .bind(currency)
        .fetch_optional(&self.pool)
        .await
        .map_err(InfraError::Database)?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self, rates))]
    async fn upsert_rates(&self, rates: &[RateEntry]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(InfraError::Database)?;

        for rate in rates {
            sqlx::query(
                "INSERT INTO exchange_rates (currency, rate_to_eur, updated_at)
                 VALUES ($1, $2, NOW())
                 ON CONFLICT (currency)
                 DO UPDATE SET rate_to_eur = $2, updated_at = NOW()",
            )
            .bind(&rate.currency)
            .bind(rate.rate_to_base)
            .execute(&mut *tx)
            .await
            .map_err(InfraError::Database)?;
        }

        tx.commit().await.map_err(InfraError::Database)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_rates(&self) -> Result<Vec<RateEntry>> {
        let rows = sqlx::query_as::<_, RateRow>(
            "SELECT currency, rate_to_eur, updated_at FROM exchange_rates ORDER BY currency",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(InfraError::Database)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
