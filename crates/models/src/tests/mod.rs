use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Entity-level queries against a migrated in-memory database
pub mod service_tests;

/// Fresh in-memory SQLite database with all migrations applied.
pub async fn memory_db() -> anyhow::Result<DatabaseConnection> {
    let db = crate::db::connect_url("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
