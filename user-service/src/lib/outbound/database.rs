use sqlx::postgres::PgConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

const MAX_CONNECTIONS: u32 = 5;
const MAINTENANCE_DATABASE: &str = "postgres";

/// Prepare the configured database and return a migrated pool.
///
/// Creates the database through the server's maintenance database if it
/// does not exist yet.
pub async fn bootstrap(config: &DatabaseConfig) -> Result<PgPool, anyhow::Error> {
    ensure_database_exists(config).await?;

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(config.connect_options())
        .await?;
    tracing::info!(
        max_connections = MAX_CONNECTIONS,
        database = %config.name,
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(database = %config.name, "Database migrations completed");

    Ok(pool)
}

async fn ensure_database_exists(config: &DatabaseConfig) -> Result<(), anyhow::Error> {
    let options = config.connect_options().database(MAINTENANCE_DATABASE);
    let mut connection = PgConnection::connect_with(&options).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&config.name)
            .fetch_one(&mut connection)
            .await?;

    if exists {
        tracing::debug!(database = %config.name, "Database already exists");
    } else {
        // Identifiers cannot be bound as parameters
        let statement = format!("CREATE DATABASE {}", quote_identifier(&config.name));
        sqlx::query(&statement).execute(&mut connection).await?;
        tracing::info!(database = %config.name, "Database created");
    }

    connection.close().await?;
    Ok(())
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
