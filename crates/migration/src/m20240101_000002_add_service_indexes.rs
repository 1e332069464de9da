use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_services::Services;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Composite unique (name, version): a lost "max + 1" race fails the insert
        manager
            .create_index(
                Index::create()
                    .name("uniq_services_name_version")
                    .table(Services::Table)
                    .col(Services::Name)
                    .col(Services::Version)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Listing filters on deleted_at before grouping by name
        manager
            .create_index(
                Index::create()
                    .name("idx_services_deleted_at")
                    .table(Services::Table)
                    .col(Services::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_services_deleted_at").table(Services::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_services_name_version").table(Services::Table).to_owned())
            .await
    }
}
