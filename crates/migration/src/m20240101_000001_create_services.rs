//! Create `services` table.
//! One row per (name, version); soft deletion through `deleted_at`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(pk_auto(Services::Id))
                    .col(string_len(Services::Name, 255).not_null())
                    .col(text(Services::Description).not_null())
                    .col(integer(Services::Version).not_null())
                    .col(boolean(Services::IsActive).not_null().default(true))
                    .col(text(Services::Tags).not_null())
                    .col(timestamp_with_time_zone(Services::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Services::UpdatedAt).not_null())
                    .col(timestamp_with_time_zone_null(Services::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Services::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Services {
    Table,
    Id,
    Name,
    Description,
    Version,
    IsActive,
    Tags,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
