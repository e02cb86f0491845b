use sea_orm_migration::prelude::*;

use super::Members;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Dives::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Dives::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Dives::MemberId).integer().not_null())
            .col(ColumnDef::new(Dives::Location).string_len(200).not_null())
            .col(ColumnDef::new(Dives::Date).date().not_null())
            .col(ColumnDef::new(Dives::Depth).decimal_len(5, 2).not_null())
            .col(
                ColumnDef::new(Dives::Duration)
                    .integer()
                    .not_null()
                    .check(Expr::col(Dives::Duration).gt(0)),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_dives_member_id")
                    .from(Dives::Table, Dives::MemberId)
                    .to(Members::Table, Members::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();

        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dives_date")
                    .table(Dives::Table)
                    .col(Dives::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dives::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Dives {
    Table,
    Id,
    MemberId,
    Location,
    Date,
    Depth,
    Duration,
}
