//! Peer-to-peer settlements.
//!
//! A `Settlement` records a direct payment inside a group: the payer's debt
//! shrinks and the payee's credit shrinks by the same amount. Like
//! expenses, settlements are append-only ledger facts.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: Uuid,
    pub group_id: Uuid,
    pub payer_id: String,
    pub payee_id: String,
    pub amount_minor: i64,
    pub created_at: DateTime<Utc>,
}

impl Settlement {
    pub fn new(
        group_id: Uuid,
        payer_id: String,
        payee_id: String,
        amount_minor: i64,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if payer_id == payee_id {
            return Err(EngineError::InvalidAmount(
                "cannot settle with yourself".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            group_id,
            payer_id,
            payee_id,
            amount_minor,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settlements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub payer_id: String,
    pub payee_id: String,
    pub amount_minor: i64,
    pub created_at: DateTimeUtc,
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

impl From<&Settlement> for ActiveModel {
    fn from(settlement: &Settlement) -> Self {
        Self {
            id: ActiveValue::Set(settlement.id.to_string()),
            group_id: ActiveValue::Set(settlement.group_id.to_string()),
            payer_id: ActiveValue::Set(settlement.payer_id.clone()),
            payee_id: ActiveValue::Set(settlement.payee_id.clone()),
            amount_minor: ActiveValue::Set(settlement.amount_minor),
            created_at: ActiveValue::Set(settlement.created_at),
        }
    }
}

impl TryFrom<Model> for Settlement {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("settlement not exists".to_string()))?,
            group_id: Uuid::parse_str(&model.group_id)
                .map_err(|_| EngineError::KeyNotFound("group not exists".to_string()))?,
            payer_id: model.payer_id,
            payee_id: model.payee_id,
            amount_minor: model.amount_minor,
            created_at: model.created_at,
        })
    }
}
