// src/web/matricula_handlers.rs
use crate::{
    error::AppResult,
    models::{aluno::Aluno, matricula::MatriculaPayload},
    services::matricula_service,
    state::AppState,
    web::extract::ValidatedJson,
};
use axum::{extract::State, Json};

/// POST /matriculas { "aluno_id": .., "turma_id": .. }
pub async fn handle_matricula(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<MatriculaPayload>,
) -> AppResult<Json<Aluno>> {
    tracing::info!(
        "POST /matriculas: aluno {} -> turma {}",
        payload.aluno_id,
        payload.turma_id
    );
    let aluno =
        matricula_service::matricular(&state.db_pool, payload.aluno_id, payload.turma_id).await?;
    Ok(Json(aluno))
}
