//! Expense groups.
//!
//! A `Group` is the unit of sharing: expenses, settlements and derived
//! balances all belong to exactly one group. Membership lives in
//! [`group_members`](super::group_members).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: String, created_by: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_by,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::group_members::Entity")]
    GroupMembers,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::settlements::Entity")]
    Settlements,
    #[sea_orm(has_many = "super::balances::Entity")]
    Balances,
}

impl Related<super::group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupMembers.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Group> for ActiveModel {
    fn from(group: &Group) -> Self {
        Self {
            id: ActiveValue::Set(group.id.to_string()),
            name: ActiveValue::Set(group.name.clone()),
            created_by: ActiveValue::Set(group.created_by.clone()),
            created_at: ActiveValue::Set(group.created_at),
        }
    }
}

impl TryFrom<Model> for Group {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("group not exists".to_string()))?,
            name: model.name,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
