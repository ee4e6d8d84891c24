use sea_orm_migration::prelude::*;

use crate::m20260110_000002_groups::Groups;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Balances {
    Table,
    Id,
    GroupId,
    LenderId,
    BorrowerId,
    AmountMinor,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Balances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Balances::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Balances::GroupId).string().not_null())
                    .col(ColumnDef::new(Balances::LenderId).string().not_null())
                    .col(ColumnDef::new(Balances::BorrowerId).string().not_null())
                    .col(
                        ColumnDef::new(Balances::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-balances-group_id")
                            .from(Balances::Table, Balances::GroupId)
                            .to(Groups::Table, Groups::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-balances-group_id")
                    .table(Balances::Table)
                    .col(Balances::GroupId)
                    .to_owned(),
            )
            .await?;

        // The simplifier emits at most one edge per ordered pair; the
        // schema holds it to that.
        manager
            .create_index(
                Index::create()
                    .name("idx-balances-pair")
                    .table(Balances::Table)
                    .col(Balances::GroupId)
                    .col(Balances::LenderId)
                    .col(Balances::BorrowerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Balances::Table).to_owned())
            .await
    }
}
