// src/services/matricula_service.rs
use crate::{
    error::{AppError, AppResult},
    models::aluno::Aluno,
    services::{aluno_service, turma_service},
};
use sqlx::SqlitePool;

/// Matricula um aluno existente numa turma com vaga.
///
/// A ocupação é recontada a cada chamada e inclui o próprio aluno se ele já
/// estiver nessa turma. O UPDATE final só é aplicado se a contagem, lida na
/// mesma instrução, ainda estiver abaixo da capacidade: dois pedidos
/// simultâneos para a última vaga não conseguem ambos passar.
pub async fn matricular(db_pool: &SqlitePool, aluno_id: i64, turma_id: i64) -> AppResult<Aluno> {
    tracing::info!("Matrícula: aluno {} -> turma {}", aluno_id, turma_id);
    let mut conn = db_pool.acquire().await?;

    if aluno_service::find_aluno_by_id(&mut *conn, aluno_id)
        .await?
        .is_none()
    {
        tracing::warn!("Matrícula falhou: aluno {} não encontrado.", aluno_id);
        return Err(AppError::NaoEncontrado("Aluno não encontrado".to_string()));
    }

    let turma = turma_service::find_turma_by_id(&mut *conn, turma_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Matrícula falhou: turma {} não encontrada.", turma_id);
            AppError::NaoEncontrado("Turma não encontrada".to_string())
        })?;

    let ocupacao = turma_service::contar_ocupacao(&mut *conn, turma_id, None).await?;
    if ocupacao >= turma.capacidade {
        tracing::warn!(
            "Matrícula falhou: turma '{}' cheia ({}/{}).",
            turma.nome,
            ocupacao,
            turma.capacidade
        );
        return Err(AppError::CapacidadeExcedida("Turma cheia".to_string()));
    }

    let atualizado = sqlx::query_as::<_, Aluno>(
        r#"
        UPDATE alunos
        SET turma_id = ?1, status = 'ativo'
        WHERE id = ?2
          AND (SELECT COUNT(*) FROM alunos WHERE turma_id = ?1) < ?3
        RETURNING id, nome, data_nascimento, email, status, turma_id
        "#,
    )
    .bind(turma_id)
    .bind(aluno_id)
    .bind(turma.capacidade)
    .fetch_optional(&mut *conn)
    .await?;

    match atualizado {
        Some(aluno) => {
            tracing::info!(
                "✅ Aluno {} matriculado na turma '{}' ({}/{}).",
                aluno.id,
                turma.nome,
                ocupacao + 1,
                turma.capacidade
            );
            Ok(aluno)
        }
        None => {
            // Outro pedido ocupou a última vaga (ou o aluno foi removido) entretanto
            match aluno_service::find_aluno_by_id(&mut *conn, aluno_id).await? {
                Some(_) => {
                    tracing::warn!(
                        "Matrícula falhou: turma '{}' ficou cheia durante o pedido.",
                        turma.nome
                    );
                    Err(AppError::CapacidadeExcedida("Turma cheia".to_string()))
                }
                None => Err(AppError::NaoEncontrado("Aluno não encontrado".to_string())),
            }
        }
    }
}
