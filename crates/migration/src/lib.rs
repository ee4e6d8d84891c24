pub use sea_orm_migration::prelude::*;

mod m20260110_000001_users;
mod m20260110_000002_groups;
mod m20260111_000001_expenses;
mod m20260111_000002_settlements;
mod m20260112_000001_balances;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_000001_users::Migration),
            Box::new(m20260110_000002_groups::Migration),
            Box::new(m20260111_000001_expenses::Migration),
            Box::new(m20260111_000002_settlements::Migration),
            Box::new(m20260112_000001_balances::Migration),
        ]
    }
}
