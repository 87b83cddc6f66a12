use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Formulas::Table)
                    .if_not_exists()
                    .col(pk_uuid(Formulas::Id))
                    .col(string_len(Formulas::Name, 255).not_null())
                    .col(text(Formulas::Description).default(""))
                    .col(string_len(Formulas::ProductType, 100).not_null())
                    .col(double_null(Formulas::BatchSize))
                    .col(string_len_null(Formulas::BatchUnit, 20))
                    .col(double_null(Formulas::TotalWeight))
                    .col(boolean(Formulas::IsPublic).default(false))
                    .col(timestamp_with_time_zone(Formulas::CreatedAt))
                    .col(timestamp_with_time_zone(Formulas::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FormulaIngredients::Table)
                    .if_not_exists()
                    .col(uuid(FormulaIngredients::FormulaId))
                    .col(uuid(FormulaIngredients::IngredientId))
                    .col(double(FormulaIngredients::Percentage).not_null())
                    .col(integer(FormulaIngredients::SortOrder).not_null())
                    .primary_key(
                        Index::create()
                            .col(FormulaIngredients::FormulaId)
                            .col(FormulaIngredients::IngredientId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_formula_ingredients_formula")
                            .from(FormulaIngredients::Table, FormulaIngredients::FormulaId)
                            .to(Formulas::Table, Formulas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_formula_ingredients_ingredient")
                            .from(FormulaIngredients::Table, FormulaIngredients::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FormulaSteps::Table)
                    .if_not_exists()
                    .col(uuid(FormulaSteps::FormulaId))
                    .col(integer(FormulaSteps::SortOrder).not_null())
                    .col(text(FormulaSteps::Description).not_null())
                    .primary_key(
                        Index::create()
                            .col(FormulaSteps::FormulaId)
                            .col(FormulaSteps::SortOrder),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_formula_steps_formula")
                            .from(FormulaSteps::Table, FormulaSteps::FormulaId)
                            .to(Formulas::Table, Formulas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_formulas_product_type")
                    .table(Formulas::Table)
                    .col(Formulas::ProductType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FormulaSteps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FormulaIngredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Formulas::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Formulas {
    Table,
    Id,
    Name,
    Description,
    ProductType,
    BatchSize,
    BatchUnit,
    TotalWeight,
    IsPublic,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FormulaIngredients {
    Table,
    FormulaId,
    IngredientId,
    Percentage,
    SortOrder,
}

#[derive(DeriveIden)]
enum FormulaSteps {
    Table,
    FormulaId,
    SortOrder,
    Description,
}

#[derive(DeriveIden)]
enum Ingredients {
    Table,
    Id,
}
