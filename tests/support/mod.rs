//! Database harness for the store tests.
//!
//! Each test gets its own embedded Postgres cluster, unless
//! `TEST_DATABASE_URL` points at an existing server. A cluster that cannot
//! start fails the test; set `SKIP_TEST_CLUSTER=1` to skip instead.

mod pg_embed;

use std::future::Future;

use pg_embedded_setup_unpriv::TestCluster;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::runtime::Runtime;

pub struct TestDb {
    pool: PgPool,
    runtime: Runtime,
    _cluster: Option<TestCluster>,
}

impl TestDb {
    pub fn start() -> Option<Self> {
        match Self::try_start() {
            Ok(db) => Some(db),
            Err(reason) => handle_cluster_setup_failure(reason),
        }
    }

    fn try_start() -> Result<Self, String> {
        let (url, cluster) = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => {
                let cluster = pg_embed::test_cluster()?;
                let url = cluster.connection().database_url("postgres").to_string();
                (url, Some(cluster))
            }
        };

        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let pool = runtime
            .block_on(async {
                let pool = PgPoolOptions::new().max_connections(10).connect(&url).await?;
                sqlx::migrate!("./migrations").run(&pool).await?;
                Ok::<_, anyhow::Error>(pool)
            })
            .map_err(|err| format!("{err:#}"))?;

        Ok(Self {
            pool,
            runtime,
            _cluster: cluster,
        })
    }

    /// Drives an async test body on this database's runtime.
    pub fn run<F, Fut>(&self, test: F)
    where
        F: FnOnce(PgPool) -> Fut,
        Fut: Future<Output = ()>,
    {
        self.runtime.block_on(test(self.pool.clone()));
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
