//! Throwaway PostgreSQL for adapter tests
//!
//! Each call starts its own container with the warranty schema applied. The
//! container lives as long as the returned `TestDatabase`.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

const IMAGE: (&str, &str) = ("postgres", "16-alpine");
const CREDENTIALS: (&str, &str) = ("warranty", "warranty");
const DATABASE: &str = "warranty_test";
const SCHEMA: &str = include_str!("../../../migrations/20240101_000001_initial_schema.sql");

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn connection_url(host: &str, port: u16) -> String {
    let (user, password) = CREDENTIALS;
    format!("postgres://{user}:{password}@{host}:{port}/{DATABASE}")
}

/// A running container plus a pool connected to it
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pool: PgPool,
}

impl TestDatabase {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Starts a fresh container and loads the schema into it
pub async fn create_isolated_test_database() -> Result<TestDatabase, BoxError> {
    let (image, tag) = IMAGE;
    let (user, password) = CREDENTIALS;
    let container = GenericImage::new(image, tag)
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stderr(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_USER", user)
        .with_env_var("POSTGRES_PASSWORD", password)
        .with_env_var("POSTGRES_DB", DATABASE)
        .start()
        .await?;

    let host = container.get_host().await?.to_string();
    let port = container.get_host_port_ipv4(5432).await?;
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&connection_url(&host, port))
        .await?;
    sqlx::raw_sql(SCHEMA).execute(&pool).await?;

    Ok(TestDatabase {
        _container: container,
        pool,
    })
}
