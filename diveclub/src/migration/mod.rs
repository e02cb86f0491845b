//! Schema migrations, applied with [`Migrator`] before serving or seeding.

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_members_table;
mod m20240101_000002_create_dives_table;
mod m20240101_000003_create_equipment_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_members_table::Migration),
            Box::new(m20240101_000002_create_dives_table::Migration),
            Box::new(m20240101_000003_create_equipment_table::Migration),
        ]
    }
}

#[derive(DeriveIden)]
pub(crate) enum Members {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    DateJoined,
    Certification,
}
