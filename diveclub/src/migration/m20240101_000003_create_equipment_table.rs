use sea_orm_migration::prelude::*;

use super::Members;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Equipment::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Equipment::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Equipment::Name).string_len(100).not_null())
            .col(
                ColumnDef::new(Equipment::EquipmentType)
                    .string_len(50)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Equipment::IsFunctional)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(ColumnDef::new(Equipment::MemberId).integer().null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_equipment_member_id")
                    .from(Equipment::Table, Equipment::MemberId)
                    .to(Members::Table, Members::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Equipment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Equipment {
    Table,
    Id,
    Name,
    EquipmentType,
    IsFunctional,
    MemberId,
}
