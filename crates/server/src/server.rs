use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{balance, expense, group, settlement, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/groups", post(group::create).get(group::list))
        .route("/groups/{id}", get(group::detail))
        .route("/groups/{id}/expenses", get(expense::list))
        .route("/groups/{id}/settlements", get(settlement::list))
        .route("/groups/{id}/balances", get(balance::group_balances))
        .route("/groups/{id}/balances/recompute", post(balance::recompute))
        .route("/expenses", post(expense::create))
        .route("/expenses/{id}/archive", post(expense::archive))
        .route("/settlements", post(settlement::create))
        .route("/balance", get(balance::summary))
        .route("/users", get(user::search))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// Builds the routed application around an engine and its database.
pub fn app(engine: Engine, db: DatabaseConnection) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };
    router(state)
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, db)).await
}
