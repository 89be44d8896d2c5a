// src/web/turma_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::turma::{Turma, TurmaDetalhe, TurmaInput},
    services::turma_service,
    state::AppState,
    web::extract::ValidatedJson,
};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

pub async fn list_turmas(State(state): State<AppState>) -> AppResult<Json<Vec<Turma>>> {
    tracing::debug!("GET /turmas");
    let turmas = turma_service::find_all_turmas(&state.db_pool).await?;
    Ok(Json(turmas))
}

pub async fn get_turma(
    State(state): State<AppState>,
    turma_id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<TurmaDetalhe>> {
    let Path(turma_id) = turma_id.map_err(|e| AppError::Validacao(e.body_text()))?;
    tracing::debug!("GET /turmas/{}", turma_id);
    let detalhe = turma_service::find_turma_detalhe(&state.db_pool, turma_id).await?;
    Ok(Json(detalhe))
}

pub async fn create_turma(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<TurmaInput>,
) -> AppResult<Json<Turma>> {
    tracing::info!("POST /turmas: Tentando criar turma {}", input.nome);
    let turma = turma_service::create_turma(&state.db_pool, &input).await?;
    Ok(Json(turma))
}
