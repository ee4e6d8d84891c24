use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, Settlement, SettlementCmd, settlements};

use super::{Engine, parse_group_uuid, with_tx};

impl Engine {
    /// Records a direct payment from the caller to `payee_id` and rebuilds
    /// the group's balances in the same transaction.
    ///
    /// Self-settlements and non-positive amounts are rejected before the
    /// ledger is touched.
    pub async fn add_settlement(&self, cmd: SettlementCmd) -> ResultEngine<Uuid> {
        let group_uuid = parse_group_uuid(&cmd.group_id)?;

        let settlement = Settlement::new(
            group_uuid,
            cmd.user_id.clone(),
            cmd.payee_id.clone(),
            cmd.amount_minor,
        )?;

        let lock = self.group_lock(group_uuid);
        let _guard = lock.lock().await;

        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_uuid, &cmd.user_id)
                .await?;
            self.require_participant(&db_tx, group_uuid, &cmd.payee_id)
                .await?;

            let entry: settlements::ActiveModel = (&settlement).into();
            entry.insert(&db_tx).await?;

            self.rebuild_group_balances(&db_tx, group_uuid).await?;

            tracing::info!(
                settlement_id = %settlement.id,
                group_id = %group_uuid,
                amount_minor = settlement.amount_minor,
                "settlement recorded"
            );
            Ok(settlement.id)
        })
    }

    /// Lists a group's settlements, newest first; member-only.
    pub async fn list_group_settlements(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<Settlement>> {
        let group_uuid = parse_group_uuid(group_id)?;

        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_uuid, user_id).await?;

            let models = settlements::Entity::find()
                .filter(settlements::Column::GroupId.eq(group_uuid.to_string()))
                .order_by_desc(settlements::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            models
                .into_iter()
                .map(Settlement::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }
}
