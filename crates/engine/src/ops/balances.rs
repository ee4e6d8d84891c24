use sea_orm::{
    Condition, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    BalanceSummary, DebtEdge, ResultEngine, Settlement, balances, expenses, netflow, settlements,
    simplify,
};

use super::{Engine, parse_group_uuid, with_tx};

impl Engine {
    /// Re-derives a group's balance rows from the full ledger.
    ///
    /// Balances are rebuilt automatically on every ledger mutation; this
    /// public entry exists as a repair tool and to make idempotence
    /// observable. Re-running it on an unchanged ledger yields an
    /// identical balance set.
    pub async fn recompute_balances(&self, group_id: &str, user_id: &str) -> ResultEngine<()> {
        let group_uuid = parse_group_uuid(group_id)?;

        let lock = self.group_lock(group_uuid);
        let _guard = lock.lock().await;

        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_uuid, user_id).await?;
            self.rebuild_group_balances(&db_tx, group_uuid).await?;
            Ok(())
        })
    }

    /// Replaces a group's balance rows with a fresh derivation from the
    /// ledger, inside the caller's transaction.
    ///
    /// Reads all non-archived expenses (with splits) and all settlements,
    /// folds them into net flows, simplifies, then deletes and bulk-inserts
    /// the group's rows. A conservation failure aborts the transaction;
    /// approximate balances are never written.
    pub(super) async fn rebuild_group_balances(
        &self,
        db_tx: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<()> {
        let expense_models = expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id.to_string()))
            .filter(expenses::Column::Archived.eq(false))
            .all(db_tx)
            .await?;
        let expenses = self.attach_splits(db_tx, expense_models).await?;

        let settlements = settlements::Entity::find()
            .filter(settlements::Column::GroupId.eq(group_id.to_string()))
            .all(db_tx)
            .await?
            .into_iter()
            .map(Settlement::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let net = netflow::net_flows(&expenses, &settlements);
        let edges = simplify::simplify(&net)?;

        balances::Entity::delete_many()
            .filter(balances::Column::GroupId.eq(group_id.to_string()))
            .exec(db_tx)
            .await?;

        if !edges.is_empty() {
            let rows: Vec<balances::ActiveModel> = edges
                .iter()
                .cloned()
                .map(|edge| edge.into_active_model(group_id))
                .collect();
            balances::Entity::insert_many(rows).exec(db_tx).await?;
        }

        tracing::debug!(
            group_id = %group_id,
            members = net.len(),
            edges = edges.len(),
            "balances rebuilt"
        );
        Ok(())
    }

    /// Current simplified debts for a group, ordered by lender then
    /// borrower; member-only.
    pub async fn group_balances(&self, group_id: &str, user_id: &str) -> ResultEngine<Vec<DebtEdge>> {
        let group_uuid = parse_group_uuid(group_id)?;

        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_uuid, user_id).await?;

            let rows = balances::Entity::find()
                .filter(balances::Column::GroupId.eq(group_uuid.to_string()))
                .order_by_asc(balances::Column::LenderId)
                .order_by_asc(balances::Column::BorrowerId)
                .all(&db_tx)
                .await?;

            Ok(rows.into_iter().map(DebtEdge::from).collect())
        })
    }

    /// The caller's position across all groups: what others owe them and
    /// what they owe.
    pub async fn balance_summary(&self, user_id: &str) -> ResultEngine<BalanceSummary> {
        with_tx!(self, |db_tx| {
            let rows = balances::Entity::find()
                .filter(
                    Condition::any()
                        .add(balances::Column::LenderId.eq(user_id.to_string()))
                        .add(balances::Column::BorrowerId.eq(user_id.to_string())),
                )
                .all(&db_tx)
                .await?;

            let mut summary = BalanceSummary::default();
            for row in rows {
                if row.lender_id == user_id {
                    summary.total_owed_minor += row.amount_minor;
                } else {
                    summary.total_due_minor += row.amount_minor;
                }
            }
            Ok(summary)
        })
    }
}
