use std::collections::HashMap;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseCmd, ResultEngine, Split, allocation::allocate_shares, expenses,
    splits,
};

use super::{Engine, parse_group_uuid, with_tx};

impl Engine {
    /// Records a new expense and rebuilds the group's balances in the same
    /// transaction.
    ///
    /// Split allocation happens before anything is written: a share list
    /// that does not reconcile with the total blocks creation entirely.
    /// The payer and every split member must belong to the group.
    pub async fn add_expense(&self, cmd: ExpenseCmd) -> ResultEngine<Uuid> {
        let group_uuid = parse_group_uuid(&cmd.group_id)?;

        let mut expense = Expense::new(
            group_uuid,
            cmd.payer_id.clone(),
            cmd.amount_minor,
            cmd.description,
            cmd.method,
            cmd.user_id.clone(),
        )?;
        expense.splits = allocate_shares(cmd.method, cmd.amount_minor, &cmd.shares)?;

        let lock = self.group_lock(group_uuid);
        let _guard = lock.lock().await;

        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_uuid, &cmd.user_id)
                .await?;
            self.require_participant(&db_tx, group_uuid, &cmd.payer_id)
                .await?;
            for split in &expense.splits {
                self.require_participant(&db_tx, group_uuid, &split.user_id)
                    .await?;
            }

            let expense_entry: expenses::ActiveModel = (&expense).into();
            expense_entry.insert(&db_tx).await?;

            let split_rows: Vec<splits::ActiveModel> = expense
                .splits
                .iter()
                .cloned()
                .map(|split| split.into_active_model(expense.id))
                .collect();
            splits::Entity::insert_many(split_rows).exec(&db_tx).await?;

            self.rebuild_group_balances(&db_tx, group_uuid).await?;

            tracing::info!(
                expense_id = %expense.id,
                group_id = %group_uuid,
                amount_minor = expense.amount_minor,
                "expense recorded"
            );
            Ok(expense.id)
        })
    }

    /// Lists a group's expenses, newest first, splits attached. Archived
    /// expenses are included and flagged; only balance derivation skips
    /// them.
    pub async fn list_group_expenses(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<Expense>> {
        let group_uuid = parse_group_uuid(group_id)?;

        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_uuid, user_id).await?;

            let models = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group_uuid.to_string()))
                .order_by_desc(expenses::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            self.attach_splits(&db_tx, models).await
        })
    }

    /// Archives an expense (the only "deletion" the ledger supports) and
    /// rebuilds the group's balances in the same transaction.
    pub async fn archive_expense(&self, expense_id: Uuid, user_id: &str) -> ResultEngine<()> {
        // Resolve the group first so its lock can be taken before the
        // transaction opens.
        let model = expenses::Entity::find_by_id(expense_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        let group_uuid = parse_group_uuid(&model.group_id)?;

        let lock = self.group_lock(group_uuid);
        let _guard = lock.lock().await;

        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_uuid, user_id).await?;

            let entry = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id.to_string()),
                archived: ActiveValue::Set(true),
                ..Default::default()
            };
            entry.update(&db_tx).await?;

            self.rebuild_group_balances(&db_tx, group_uuid).await?;

            tracing::info!(expense_id = %expense_id, group_id = %group_uuid, "expense archived");
            Ok(())
        })
    }

    /// Attaches split rows to expense models and converts to domain types.
    pub(super) async fn attach_splits(
        &self,
        db_tx: &DatabaseTransaction,
        models: Vec<expenses::Model>,
    ) -> ResultEngine<Vec<Expense>> {
        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let split_models = splits::Entity::find()
            .filter(splits::Column::ExpenseId.is_in(ids))
            .all(db_tx)
            .await?;

        let mut by_expense: HashMap<String, Vec<Split>> = HashMap::new();
        for model in split_models {
            let expense_id = model.expense_id.clone();
            by_expense
                .entry(expense_id)
                .or_default()
                .push(Split::try_from(model)?);
        }

        models
            .into_iter()
            .map(|model| {
                let splits = by_expense.remove(&model.id).unwrap_or_default();
                let mut expense = Expense::try_from(model)?;
                expense.splits = splits;
                Ok(expense)
            })
            .collect()
    }
}
