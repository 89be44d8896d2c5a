// src/services/turma_service.rs
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::turma::{Turma, TurmaDetalhe, TurmaInput},
};
use sqlx::{SqliteExecutor, SqlitePool};

/// Busca todas as turmas, pela ordem de criação.
pub async fn find_all_turmas(db_pool: &SqlitePool) -> AppResult<Vec<Turma>> {
    tracing::debug!("Buscando todas as turmas...");
    let turmas = sqlx::query_as::<_, Turma>(
        r#"
        SELECT id, nome, capacidade
        FROM turmas
        ORDER BY id ASC
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontradas {} turmas.", turmas.len());
    Ok(turmas)
}

pub async fn find_turma_by_id<'e, E>(executor: E, turma_id: i64) -> AppResult<Option<Turma>>
where
    E: SqliteExecutor<'e>,
{
    tracing::debug!("Buscando turma por ID: {}", turma_id);
    let turma = sqlx::query_as::<_, Turma>(
        r#"
        SELECT id, nome, capacidade
        FROM turmas
        WHERE id = ?1
        "#,
    )
    .bind(turma_id)
    .fetch_optional(executor)
    .await?;
    Ok(turma)
}

/// Número de alunos que referenciam a turma, recontado a cada chamada.
/// `ignorar_aluno` exclui um aluno da contagem (usado ao editar o próprio aluno).
pub async fn contar_ocupacao<'e, E>(
    executor: E,
    turma_id: i64,
    ignorar_aluno: Option<i64>,
) -> AppResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let ocupacao: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM alunos
        WHERE turma_id = ?1 AND (?2 IS NULL OR id != ?2)
        "#,
    )
    .bind(turma_id)
    .bind(ignorar_aluno)
    .fetch_one(executor)
    .await?;
    tracing::debug!("Ocupação da turma {}: {}", turma_id, ocupacao);
    Ok(ocupacao)
}

pub async fn create_turma(db_pool: &SqlitePool, input: &TurmaInput) -> AppResult<Turma> {
    tracing::info!("Tentando criar turma: {}", input.nome);

    let result = sqlx::query_as::<_, Turma>(
        r#"
        INSERT INTO turmas (nome, capacidade)
        VALUES (?1, ?2)
        RETURNING id, nome, capacidade
        "#,
    )
    .bind(&input.nome)
    .bind(input.capacidade)
    .fetch_one(db_pool)
    .await;

    match result {
        Ok(turma) => {
            tracing::info!("✅ Turma '{}' criada com id {}.", turma.nome, turma.id);
            Ok(turma)
        }
        Err(e) if is_unique_violation(&e) => {
            tracing::warn!("Falha ao criar turma: nome '{}' já existe.", input.nome);
            Err(AppError::Conflito(format!(
                "Já existe uma turma com o nome '{}'",
                input.nome
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// Turma com ocupação e vagas restantes.
pub async fn find_turma_detalhe(db_pool: &SqlitePool, turma_id: i64) -> AppResult<TurmaDetalhe> {
    let mut conn = db_pool.acquire().await?;
    let turma = find_turma_by_id(&mut *conn, turma_id)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Turma não encontrada".to_string()))?;
    let ocupacao = contar_ocupacao(&mut *conn, turma_id, None).await?;
    Ok(TurmaDetalhe::new(turma, ocupacao))
}
