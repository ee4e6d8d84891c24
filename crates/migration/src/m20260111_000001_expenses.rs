use sea_orm_migration::prelude::*;

use crate::m20260110_000001_users::Users;
use crate::m20260110_000002_groups::Groups;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    GroupId,
    PayerId,
    AmountMinor,
    Description,
    SplitMethod,
    Archived,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum Splits {
    Table,
    Id,
    ExpenseId,
    UserId,
    AmountMinor,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::GroupId).string().not_null())
                    .col(ColumnDef::new(Expenses::PayerId).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .col(ColumnDef::new(Expenses::SplitMethod).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::Archived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Expenses::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-group_id")
                            .from(Expenses::Table, Expenses::GroupId)
                            .to(Groups::Table, Groups::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-payer_id")
                            .from(Expenses::Table, Expenses::PayerId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-group_id-created_at")
                    .table(Expenses::Table)
                    .col(Expenses::GroupId)
                    .col(Expenses::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Splits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Splits::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Splits::ExpenseId).string().not_null())
                    .col(ColumnDef::new(Splits::UserId).string().not_null())
                    .col(ColumnDef::new(Splits::AmountMinor).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-splits-expense_id")
                            .from(Splits::Table, Splits::ExpenseId)
                            .to(Expenses::Table, Expenses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-splits-user_id")
                            .from(Splits::Table, Splits::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-splits-expense_id")
                    .table(Splits::Table)
                    .col(Splits::ExpenseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Splits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        Ok(())
    }
}
