//! Settlement API endpoints

use api_types::settlement::{
    SettlementCreated, SettlementNew, SettlementView, SettlementsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SettlementNew>,
) -> Result<(StatusCode, Json<SettlementCreated>), ServerError> {
    let id = state
        .engine
        .add_settlement(engine::SettlementCmd {
            group_id: payload.group_id,
            payee_id: payload.payee_id,
            amount_minor: payload.amount_minor,
            user_id: user.username.clone(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(SettlementCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<SettlementsResponse>, ServerError> {
    let settlements = state
        .engine
        .list_group_settlements(&group_id, &user.username)
        .await?
        .into_iter()
        .map(|settlement| SettlementView {
            id: settlement.id,
            payer_id: settlement.payer_id,
            payee_id: settlement.payee_id,
            amount_minor: settlement.amount_minor,
            created_at: settlement.created_at,
        })
        .collect();

    Ok(Json(SettlementsResponse { settlements }))
}
