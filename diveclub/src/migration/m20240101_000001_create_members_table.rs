use sea_orm_migration::prelude::*;

use super::Members;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Members::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Members::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Members::FirstName).string_len(100).not_null())
            .col(ColumnDef::new(Members::LastName).string_len(100).not_null())
            .col(
                ColumnDef::new(Members::Email)
                    .string_len(254)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Members::DateJoined).date().not_null())
            .col(
                ColumnDef::new(Members::Certification)
                    .string_len(100)
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_members_last_first")
                    .table(Members::Table)
                    .col(Members::LastName)
                    .col(Members::FirstName)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await
    }
}
