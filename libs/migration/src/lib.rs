pub use sea_orm_migration::prelude::*;

mod m20260110_000000_create_ingredients;
mod m20260110_000001_create_formulas;
mod m20260110_000002_create_currencies;
mod m20260110_000003_seed_currencies;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_000000_create_ingredients::Migration),
            Box::new(m20260110_000001_create_formulas::Migration),
            Box::new(m20260110_000002_create_currencies::Migration),
            Box::new(m20260110_000003_seed_currencies::Migration),
        ]
    }
}
