use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use fleet_core::config::PostgresConfig;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create the PostgreSQL pool.
///
/// An unreachable database does not stop startup: the pool is created lazily
/// instead, so requests fail with a storage error until it comes back.
pub async fn init_pg_pool(config: &PostgresConfig) -> Result<PgPool, sqlx::Error> {
    if !config.is_configured() {
        warn!("PG_USERNAME / DATABASE_URL not set, connecting with default credentials");
    }

    let url = config.connection_string();
    let options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT);

    match options.clone().connect(&url).await {
        Ok(pool) => {
            info!("PostgreSQL connected: {}/{}", config.host, config.database);
            Ok(pool)
        }
        Err(e) => {
            warn!("Failed to connect to PostgreSQL: {}; requests will fail until it is reachable", e);
            options.connect_lazy(&url)
        }
    }
}
