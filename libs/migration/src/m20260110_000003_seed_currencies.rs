use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Initial currency set with approximate USD multipliers; the
        // rates-collector refreshes these from the live provider.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                INSERT INTO currencies (id, code, name, symbol, rate_to_usd, is_active, last_updated, created_at)
                VALUES
                    ('01946a2e-1c00-7000-8000-000000000001', 'USD', 'US Dollar', '$', 1.0, TRUE, NOW(), NOW()),
                    ('01946a2e-1c00-7000-8000-000000000002', 'EUR', 'Euro', '€', 0.85, TRUE, NOW(), NOW()),
                    ('01946a2e-1c00-7000-8000-000000000003', 'GBP', 'British Pound', '£', 0.73, TRUE, NOW(), NOW()),
                    ('01946a2e-1c00-7000-8000-000000000004', 'CAD', 'Canadian Dollar', 'C$', 1.35, TRUE, NOW(), NOW()),
                    ('01946a2e-1c00-7000-8000-000000000005', 'AUD', 'Australian Dollar', 'A$', 1.55, TRUE, NOW(), NOW()),
                    ('01946a2e-1c00-7000-8000-000000000006', 'JPY', 'Japanese Yen', '¥', 150.0, TRUE, NOW(), NOW())
                ON CONFLICT (code) DO NOTHING
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DELETE FROM currencies WHERE code IN ('USD', 'EUR', 'GBP', 'CAD', 'AUD', 'JPY')",
            )
            .await?;

        Ok(())
    }
}
