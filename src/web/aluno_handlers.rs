// src/web/aluno_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::aluno::{Aluno, AlunoFiltro, AlunoInput},
    services::aluno_service,
    state::AppState,
    web::extract::ValidatedJson,
};
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde_json::{json, Value};

/// GET /alunos?search=&turma_id=&status=
pub async fn list_alunos(
    State(state): State<AppState>,
    filtro: Result<Query<AlunoFiltro>, QueryRejection>,
) -> AppResult<Json<Vec<Aluno>>> {
    let Query(filtro) = filtro.map_err(|e| AppError::Validacao(e.body_text()))?;
    tracing::debug!("GET /alunos: {:?}", filtro);
    let alunos = aluno_service::find_alunos(&state.db_pool, &filtro).await?;
    Ok(Json(alunos))
}

/// GET /alunos/{id}
pub async fn get_aluno(
    State(state): State<AppState>,
    aluno_id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Aluno>> {
    let Path(aluno_id) = aluno_id.map_err(|e| AppError::Validacao(e.body_text()))?;
    tracing::debug!("GET /alunos/{}", aluno_id);
    let aluno = aluno_service::find_aluno_by_id(&state.db_pool, aluno_id)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Aluno não encontrado".to_string()))?;
    Ok(Json(aluno))
}

/// POST /alunos - valida a idade mínima antes de gravar.
pub async fn create_aluno(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<AlunoInput>,
) -> AppResult<Json<Aluno>> {
    tracing::info!("POST /alunos: Tentando criar aluno {}", input.nome);

    let hoje = chrono::Local::now().date_naive();
    input.validar_idade_minima(hoje)?;

    let aluno = aluno_service::create_aluno(&state.db_pool, &input).await?;
    Ok(Json(aluno))
}

/// PUT /alunos/{id} - substituição completa.
pub async fn update_aluno(
    State(state): State<AppState>,
    aluno_id: Result<Path<i64>, PathRejection>,
    ValidatedJson(input): ValidatedJson<AlunoInput>,
) -> AppResult<Json<Aluno>> {
    let Path(aluno_id) = aluno_id.map_err(|e| AppError::Validacao(e.body_text()))?;
    tracing::info!("PUT /alunos/{}: Processando edição...", aluno_id);
    let aluno = aluno_service::update_aluno(&state.db_pool, aluno_id, &input).await?;
    Ok(Json(aluno))
}

/// DELETE /alunos/{id}
pub async fn delete_aluno(
    State(state): State<AppState>,
    aluno_id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Value>> {
    let Path(aluno_id) = aluno_id.map_err(|e| AppError::Validacao(e.body_text()))?;
    tracing::info!("DELETE /alunos/{}", aluno_id);
    aluno_service::delete_aluno(&state.db_pool, aluno_id).await?;
    Ok(Json(json!({ "ok": true })))
}
