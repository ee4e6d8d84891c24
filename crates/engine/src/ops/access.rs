use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, group_members, groups, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound(format!(
                "user {username} not exists"
            )));
        }
        Ok(())
    }

    pub(super) async fn require_group_by_id(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<groups::Model> {
        groups::Entity::find_by_id(group_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))
    }

    pub(super) async fn group_member_exists(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<bool> {
        group_members::Entity::find_by_id((group_id.to_string(), user_id.to_string()))
            .one(db)
            .await
            .map(|row| row.is_some())
            .map_err(Into::into)
    }

    /// Fails with `KeyNotFound` when the group is missing and `Forbidden`
    /// when the caller is not a member.
    pub(super) async fn require_group_member(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<groups::Model> {
        let group = self.require_group_by_id(db, group_id).await?;
        if !self.group_member_exists(db, group_id, user_id).await? {
            return Err(EngineError::Forbidden(format!(
                "{user_id} is not a member of this group"
            )));
        }
        Ok(group)
    }

    /// Fails with `InvalidSplit` when `user_id` is not a group member;
    /// used to validate expense participants, whose absence is a payload
    /// problem rather than an authorization one.
    pub(super) async fn require_participant(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        if !self.group_member_exists(db, group_id, user_id).await? {
            return Err(EngineError::InvalidSplit(format!(
                "{user_id} is not a member of this group"
            )));
        }
        Ok(())
    }
}
