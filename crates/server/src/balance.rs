//! Balance API endpoints
//!
//! Balances are read-only derived state; the only write-shaped route is
//! the explicit recompute, which rebuilds a group's rows from the ledger.

use api_types::balance::{BalanceSummary, BalanceView, GroupBalancesResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

pub async fn group_balances(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupBalancesResponse>, ServerError> {
    let balances = state
        .engine
        .group_balances(&group_id, &user.username)
        .await?
        .into_iter()
        .map(|edge| BalanceView {
            lender_id: edge.lender_id,
            borrower_id: edge.borrower_id,
            amount_minor: edge.amount_minor,
        })
        .collect();

    Ok(Json(GroupBalancesResponse { balances }))
}

pub async fn recompute(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .recompute_balances(&group_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BalanceSummary>, ServerError> {
    let summary = state.engine.balance_summary(&user.username).await?;

    Ok(Json(BalanceSummary {
        total_owed_minor: summary.total_owed_minor,
        total_due_minor: summary.total_due_minor,
    }))
}
