//! Expense API endpoints

use api_types::expense::{
    ExpenseCreated, ExpenseNew, ExpenseView, ExpensesResponse, SplitMethod as ApiMethod,
    SplitView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_method(method: ApiMethod) -> engine::SplitMethod {
    match method {
        ApiMethod::Equal => engine::SplitMethod::Equal,
        ApiMethod::Exact => engine::SplitMethod::Exact,
        ApiMethod::Percent => engine::SplitMethod::Percent,
    }
}

fn map_method_back(method: engine::SplitMethod) -> ApiMethod {
    match method {
        engine::SplitMethod::Equal => ApiMethod::Equal,
        engine::SplitMethod::Exact => ApiMethod::Exact,
        engine::SplitMethod::Percent => ApiMethod::Percent,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let shares = payload
        .shares
        .into_iter()
        .map(|share| engine::ShareSpec {
            user_id: share.user_id,
            amount_minor: share.amount_minor,
            percent_bp: share.percent_bp,
        })
        .collect();

    let id = state
        .engine
        .add_expense(engine::ExpenseCmd {
            group_id: payload.group_id,
            payer_id: payload.payer_id,
            amount_minor: payload.amount_minor,
            description: payload.description,
            method: map_method(payload.method),
            shares,
            user_id: user.username.clone(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ExpenseCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let expenses = state
        .engine
        .list_group_expenses(&group_id, &user.username)
        .await?
        .into_iter()
        .map(|expense| ExpenseView {
            id: expense.id,
            payer_id: expense.payer_id,
            amount_minor: expense.amount_minor,
            description: expense.description,
            method: map_method_back(expense.method),
            archived: expense.archived,
            created_at: expense.created_at,
            splits: expense
                .splits
                .into_iter()
                .map(|split| SplitView {
                    user_id: split.user_id,
                    amount_minor: split.amount_minor,
                })
                .collect(),
        })
        .collect();

    Ok(Json(ExpensesResponse { expenses }))
}

pub async fn archive(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.archive_expense(expense_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
