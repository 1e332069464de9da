use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Open a pooled connection from the database section of the app config.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    if cfg.url.contains(":memory:") {
        // every pooled connection would otherwise see its own empty database
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(cfg.max_connections).min_connections(cfg.min_connections);
    }
    let db = Database::connect(opts).await?;
    info!(sqlite = cfg.is_sqlite(), max_connections = cfg.max_connections, "database connected");
    Ok(db)
}

/// Connect with default pool settings.
pub async fn connect_url(url: &str) -> anyhow::Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: url.to_string(), ..DatabaseConfig::default() };
    connect(&cfg).await
}
