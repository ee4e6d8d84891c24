//! Expense primitives.
//!
//! An `Expense` is an immutable ledger fact: one member fronted
//! `amount_minor` and the cost is divided among members via
//! [`Split`](crate::Split) rows. Archival is the only mutation after
//! creation, and archived expenses are excluded from balance derivation.
//!
//! Amounts are integer **minor units** (cents): fractional drift cannot
//! occur, so split sums are checked for exact equality.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Split};

/// How an expense's total is divided among members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    Equal,
    Exact,
    Percent,
}

impl SplitMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Exact => "exact",
            Self::Percent => "percent",
        }
    }
}

impl TryFrom<&str> for SplitMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            "exact" => Ok(Self::Exact),
            "percent" => Ok(Self::Percent),
            other => Err(EngineError::InvalidSplit(format!(
                "invalid split method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub group_id: Uuid,
    pub payer_id: String,
    pub amount_minor: i64,
    pub description: String,
    pub method: SplitMethod,
    pub archived: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub splits: Vec<Split>,
}

impl Expense {
    pub fn new(
        group_id: Uuid,
        payer_id: String,
        amount_minor: i64,
        description: String,
        method: SplitMethod,
        created_by: String,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            group_id,
            payer_id,
            amount_minor,
            description,
            method,
            archived: false,
            created_by,
            created_at: Utc::now(),
            splits: Vec::new(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub payer_id: String,
    pub amount_minor: i64,
    pub description: String,
    pub split_method: String,
    pub archived: bool,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::splits::Entity")]
    Splits,
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Groups,
}

impl Related<super::splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            group_id: ActiveValue::Set(expense.group_id.to_string()),
            payer_id: ActiveValue::Set(expense.payer_id.clone()),
            amount_minor: ActiveValue::Set(expense.amount_minor),
            description: ActiveValue::Set(expense.description.clone()),
            split_method: ActiveValue::Set(expense.method.as_str().to_string()),
            archived: ActiveValue::Set(expense.archived),
            created_by: ActiveValue::Set(expense.created_by.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            group_id: Uuid::parse_str(&model.group_id)
                .map_err(|_| EngineError::KeyNotFound("group not exists".to_string()))?,
            payer_id: model.payer_id,
            amount_minor: model.amount_minor,
            description: model.description,
            method: SplitMethod::try_from(model.split_method.as_str())?,
            archived: model.archived,
            created_by: model.created_by,
            created_at: model.created_at,
            splits: Vec::new(),
        })
    }
}
