use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Group, ResultEngine, group_members, groups};

use super::{Engine, normalize_required_name, parse_group_uuid, with_tx};

impl Engine {
    /// Creates a group with the caller plus `members` as its member set.
    ///
    /// The member list is deduplicated and the creator is always included,
    /// so passing the creator again is harmless. Every member must be an
    /// existing user.
    pub async fn create_group(
        &self,
        name: &str,
        members: &[String],
        user_id: &str,
    ) -> ResultEngine<String> {
        let name = normalize_required_name(name, "group")?;

        let group = Group::new(name, user_id.to_string());
        let group_id = group.id;
        let group_entry: groups::ActiveModel = (&group).into();

        let mut member_ids: Vec<String> = vec![user_id.to_string()];
        for member in members {
            if !member_ids.contains(member) {
                member_ids.push(member.clone());
            }
        }

        with_tx!(self, |db_tx| {
            for member in &member_ids {
                self.require_user_exists(&db_tx, member).await?;
            }

            group_entry.insert(&db_tx).await?;
            let rows: Vec<group_members::ActiveModel> = member_ids
                .iter()
                .map(|member| group_members::ActiveModel {
                    group_id: ActiveValue::Set(group_id.to_string()),
                    user_id: ActiveValue::Set(member.clone()),
                })
                .collect();
            group_members::Entity::insert_many(rows).exec(&db_tx).await?;

            tracing::info!(group_id = %group_id, members = member_ids.len(), "group created");
            Ok(group_id.to_string())
        })
    }

    /// Lists the groups the caller belongs to, newest first.
    pub async fn list_groups(&self, user_id: &str) -> ResultEngine<Vec<Group>> {
        with_tx!(self, |db_tx| {
            let memberships = group_members::Entity::find()
                .filter(group_members::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?;
            let group_ids: Vec<String> = memberships.into_iter().map(|m| m.group_id).collect();

            let models = groups::Entity::find()
                .filter(groups::Column::Id.is_in(group_ids))
                .order_by_desc(groups::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            models
                .into_iter()
                .map(Group::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Returns a group and its member list; member-only.
    pub async fn group_detail(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<(Group, Vec<String>)> {
        let group_uuid = parse_group_uuid(group_id)?;

        with_tx!(self, |db_tx| {
            let model = self.require_group_member(&db_tx, group_uuid, user_id).await?;

            let mut members: Vec<String> = group_members::Entity::find()
                .filter(group_members::Column::GroupId.eq(group_uuid.to_string()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|m| m.user_id)
                .collect();
            members.sort();

            Ok((Group::try_from(model)?, members))
        })
    }
}
