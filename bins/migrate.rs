use common::utils::logging::{init_logging, LogFormat};
use dotenvy::dotenv;
use migration::MigratorTrait;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = configs::AppConfig::load_and_validate()?;
    init_logging(&cfg.logging.level, LogFormat::parse(&cfg.logging.format));

    let db = models::db::connect(&cfg.database).await?;
    info!(service = "migrate", event = "start", "applying migrations");
    if let Err(e) = migration::Migrator::up(&db, None).await {
        error!(service = "migrate", event = "failed", error = %e, "migration failed");
        return Err(e.into());
    }
    info!(service = "migrate", event = "done", "migrations applied");
    Ok(())
}
