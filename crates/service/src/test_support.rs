#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Fresh in-memory SQLite database per test; nothing is shared between tests.
pub async fn memory_db() -> DatabaseConnection {
    let db = models::db::connect_url("sqlite::memory:").await.expect("open sqlite memory db");
    migration::Migrator::up(&db, None).await.expect("migrate up");
    db
}
