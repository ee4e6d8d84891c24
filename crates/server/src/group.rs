//! Group API endpoints

use api_types::group::{GroupCreated, GroupDetailResponse, GroupNew, GroupView, GroupsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

fn map_group(group: engine::Group) -> GroupView {
    GroupView {
        id: group.id.to_string(),
        name: group.name,
        created_by: group.created_by,
        created_at: group.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupCreated>), ServerError> {
    let id = state
        .engine
        .create_group(&payload.name, &payload.members, &user.username)
        .await?;

    Ok((StatusCode::CREATED, Json(GroupCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GroupsResponse>, ServerError> {
    let groups = state
        .engine
        .list_groups(&user.username)
        .await?
        .into_iter()
        .map(map_group)
        .collect();

    Ok(Json(GroupsResponse { groups }))
}

pub async fn detail(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupDetailResponse>, ServerError> {
    let (group, members) = state.engine.group_detail(&group_id, &user.username).await?;

    Ok(Json(GroupDetailResponse {
        group: map_group(group),
        members,
    }))
}
