//! Derived balance rows.
//!
//! Balances are a disposable materialized view over the ledger: on every
//! mutation that changes a group's ledger, the group's rows are deleted and
//! regenerated from scratch by the simplifier. They are never edited in
//! place.
//!
//! Invariants after a recompute: `lender_id != borrower_id`,
//! `amount_minor > 0`, at most one row per (lender, borrower) pair per
//! group.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One simplified pairwise debt: `borrower_id` owes `lender_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtEdge {
    pub lender_id: String,
    pub borrower_id: String,
    pub amount_minor: i64,
}

/// A user's position across all groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Sum over rows where the user is lender.
    pub total_owed_minor: i64,
    /// Sum over rows where the user is borrower.
    pub total_due_minor: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub lender_id: String,
    pub borrower_id: String,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Groups,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl DebtEdge {
    pub(crate) fn into_active_model(self, group_id: Uuid) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            group_id: ActiveValue::Set(group_id.to_string()),
            lender_id: ActiveValue::Set(self.lender_id),
            borrower_id: ActiveValue::Set(self.borrower_id),
            amount_minor: ActiveValue::Set(self.amount_minor),
        }
    }
}

impl From<Model> for DebtEdge {
    fn from(model: Model) -> Self {
        Self {
            lender_id: model.lender_id,
            borrower_id: model.borrower_id,
            amount_minor: model.amount_minor,
        }
    }
}
