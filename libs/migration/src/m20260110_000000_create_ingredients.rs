use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(pk_uuid(Ingredients::Id))
                    .col(string_len(Ingredients::Name, 255).not_null())
                    .col(string_len_null(Ingredients::InciName, 255))
                    .col(text(Ingredients::Description).default(""))
                    .col(string_len_null(Ingredients::Phase, 100))
                    .col(string_len_null(Ingredients::Function, 100))
                    .col(double_null(Ingredients::MaxPercentage))
                    .col(boolean(Ingredients::IsPremium).default(false))
                    .col(boolean(Ingredients::IsProfessional).default(false))
                    .col(double_null(Ingredients::PurchaseCost))
                    .col(double_null(Ingredients::PurchaseQuantity))
                    .col(string_len_null(Ingredients::PurchaseUnit, 20))
                    .col(string_len_null(Ingredients::Currency, 3))
                    .col(double_null(Ingredients::ShippingCost))
                    .col(double_null(Ingredients::CostPerGram))
                    .col(double_null(Ingredients::CostPerOz))
                    .col(timestamp_with_time_zone_null(Ingredients::LastUpdatedCost))
                    .col(timestamp_with_time_zone(Ingredients::CreatedAt))
                    .col(timestamp_with_time_zone(Ingredients::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Phase and function drive composer availability lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_ingredients_phase")
                    .table(Ingredients::Table)
                    .col(Ingredients::Phase)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ingredients_function")
                    .table(Ingredients::Table)
                    .col(Ingredients::Function)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Ingredients {
    Table,
    Id,
    Name,
    InciName,
    Description,
    Phase,
    Function,
    MaxPercentage,
    IsPremium,
    IsProfessional,
    PurchaseCost,
    PurchaseQuantity,
    PurchaseUnit,
    Currency,
    ShippingCost,
    CostPerGram,
    CostPerOz,
    LastUpdatedCost,
    CreatedAt,
    UpdatedAt,
}
