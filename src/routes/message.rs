use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Connection details echoed back to the caller. Never includes the password.
#[derive(Debug, Serialize)]
pub struct DbInfo {
    pub host: String,
    pub name: String,
    pub user: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub db: DbInfo,
    pub hits: i32,
}

/// Ensure the counter row exists, bump it and report the new value.
pub async fn message(State(state): State<AppState>) -> Result<Json<MessageResponse>, AppError> {
    state.db.ensure_schema().await?;
    let hits = state.db.increment_hits().await?;

    tracing::debug!(hits, "Counter incremented");

    let config = &state.config;
    Ok(Json(MessageResponse {
        message: config.message.clone(),
        db: DbInfo {
            host: config.db.host.clone(),
            name: config.db.name.clone(),
            user: config.db.user.clone(),
        },
        hits,
    }))
}
