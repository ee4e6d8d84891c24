use sea_orm_migration::prelude::*;

use crate::m20260110_000001_users::Users;
use crate::m20260110_000002_groups::Groups;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Settlements {
    Table,
    Id,
    GroupId,
    PayerId,
    PayeeId,
    AmountMinor,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Settlements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Settlements::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Settlements::GroupId).string().not_null())
                    .col(ColumnDef::new(Settlements::PayerId).string().not_null())
                    .col(ColumnDef::new(Settlements::PayeeId).string().not_null())
                    .col(
                        ColumnDef::new(Settlements::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Settlements::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-settlements-group_id")
                            .from(Settlements::Table, Settlements::GroupId)
                            .to(Groups::Table, Groups::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-settlements-payer_id")
                            .from(Settlements::Table, Settlements::PayerId)
                            .to(Users::Table, Users::Username),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-settlements-payee_id")
                            .from(Settlements::Table, Settlements::PayeeId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-settlements-group_id")
                    .table(Settlements::Table)
                    .col(Settlements::GroupId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Settlements::Table).to_owned())
            .await
    }
}
