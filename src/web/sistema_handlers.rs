// src/web/sistema_handlers.rs
use crate::{error::AppResult, services::seed_service, state::AppState};
use axum::{extract::State, Json};
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /seed - recria os dados de demonstração.
pub async fn handle_seed(State(state): State<AppState>) -> AppResult<Json<Value>> {
    tracing::info!("POST /seed");
    seed_service::executar_seed(&state.db_pool).await?;
    Ok(Json(json!({ "ok": true })))
}
