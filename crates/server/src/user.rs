//! Users entity as seen by the auth middleware, plus the search endpoint.

use api_types::user::UsersResponse;
use axum::{
    Json,
    extract::{Query, State},
};
use sea_orm::entity::prelude::*;
use serde::Deserialize;

use crate::{ServerError, server::ServerState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<UsersResponse>, ServerError> {
    let Some(query) = params.q else {
        return Err(ServerError::Generic("search query required".to_string()));
    };

    let users = state.engine.search_users(&query).await?;

    Ok(Json(UsersResponse { users }))
}
