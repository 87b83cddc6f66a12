use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Currencies::Table)
                    .if_not_exists()
                    .col(pk_uuid(Currencies::Id))
                    .col(string_len(Currencies::Code, 3).not_null().unique_key())
                    .col(string_len(Currencies::Name, 100).not_null())
                    .col(string_len(Currencies::Symbol, 8).not_null())
                    .col(double(Currencies::RateToUsd).not_null())
                    .col(boolean(Currencies::IsActive).default(true))
                    .col(timestamp_with_time_zone(Currencies::LastUpdated))
                    .col(timestamp_with_time_zone(Currencies::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Currencies {
    Table,
    Id,
    Code,
    Name,
    Symbol,
    RateToUsd,
    IsActive,
    LastUpdated,
    CreatedAt,
}
