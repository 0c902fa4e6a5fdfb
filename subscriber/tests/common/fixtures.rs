//! Test fixtures for the store integration tests.

use sqlx::PgPool;
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::ContainerAsync;
use testcontainers_modules::testcontainers::runners::AsyncRunner;

use subscriber::store::PostgresStore;

/// A real Postgres instance, running the subscriber's migrations, kept
/// alive for the lifetime of the test.
pub struct TestDb {
    pub store: PostgresStore,
    _container: ContainerAsync<Postgres>,
}

impl TestDb {
    /// Start a fresh container, connect, and run migrations.
    ///
    /// # Panics
    /// Panics if the container, connection, or migrations fail — these
    /// are setup failures, not assertions under test.
    pub async fn new() -> Self {
        let container = Postgres::default()
            .start()
            .await
            .expect("failed to start postgres container");

        let host = container.get_host().await.expect("failed to get host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("failed to get port");
        let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

        let pool = connect_with_retries(&url, 30)
            .await
            .expect("failed to connect to postgres");
        let store = PostgresStore::new(pool);
        store.run_migrations().await.expect("failed to migrate");

        Self {
            store,
            _container: container,
        }
    }
}

async fn connect_with_retries(url: &str, max_attempts: u32) -> Result<PgPool, sqlx::Error> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match PgPool::connect(url).await {
            Ok(pool) => return Ok(pool),
            Err(err) if attempts < max_attempts => {
                tracing::debug!(%err, attempts, "postgres not ready yet, retrying");
                tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            }
            Err(err) => return Err(err),
        }
    }
}
