//! Postgres-backed adapters for [`PlayerStore`](casino_core::ports::PlayerStore)
//! and [`ExchangeRateStore`](casino_core::ports::ExchangeRateStore).
//!
//! Both ports are served out of the same connection pool against the two
//! relations fixed by the external interface (§6): `players` and
//! `exchange_rates`.

mod postgres;

pub use postgres::PostgresStore;
pub use sqlx::PgPool;
