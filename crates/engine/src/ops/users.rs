use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, users};

use super::{Engine, with_tx};

/// Cap on search results; enough to build a member list from.
const SEARCH_LIMIT: u64 = 10;

impl Engine {
    /// Finds usernames containing `query`, for member-list building.
    /// Case-insensitive substring match, at most ten results.
    pub async fn search_users(&self, query: &str) -> ResultEngine<Vec<String>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(EngineError::InvalidName(
                "search query must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let models = users::Entity::find()
                .filter(users::Column::Username.contains(query))
                .order_by_asc(users::Column::Username)
                .limit(SEARCH_LIMIT)
                .all(&db_tx)
                .await?;

            Ok(models.into_iter().map(|m| m.username).collect())
        })
    }
}
