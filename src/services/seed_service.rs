// src/services/seed_service.rs
//! Dados de demonstração: apaga tudo e recria três turmas e vinte alunos.
use crate::{
    error::AppResult,
    models::aluno::{STATUS_ATIVO, STATUS_INATIVO},
};
use chrono::NaiveDate;
use rand::Rng;
use sqlx::SqlitePool;

const TURMAS_SEED: &[(&str, i64)] = &[("1A - Manhã", 10), ("2B - Tarde", 8), ("3C - Noite", 12)];

const NOMES_SEED: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Eduarda", "Felipe", "Gabriela", "Heitor", "Isabela", "João",
    "Karla", "Lucas", "Marina", "Neto", "Olivia", "Paulo", "Quésia", "Rafael", "Sofia", "Tiago",
];

#[derive(Debug, Clone)]
struct AlunoSeed {
    nome: String,
    data_nascimento: NaiveDate,
    email: String,
    // índice em TURMAS_SEED
    turma: Option<usize>,
}

fn data_aleatoria<R: Rng>(rng: &mut R, ano_inicio: i32, ano_fim: i32) -> NaiveDate {
    let inicio = NaiveDate::from_ymd_opt(ano_inicio, 1, 1).unwrap_or_default();
    let fim = NaiveDate::from_ymd_opt(ano_fim, 12, 31).unwrap_or_default();
    let dias = rng.gen_range(0..=(fim - inicio).num_days());
    inicio + chrono::Duration::days(dias)
}

/// Gera os alunos e escolhe uma turma ao acaso para cada um; quem calha numa
/// turma já cheia fica sem turma.
fn gerar_alunos<R: Rng>(rng: &mut R) -> Vec<AlunoSeed> {
    let mut ocupacao = vec![0i64; TURMAS_SEED.len()];

    NOMES_SEED
        .iter()
        .enumerate()
        .map(|(i, nome)| {
            let idx = rng.gen_range(0..TURMAS_SEED.len());
            let turma = if ocupacao[idx] < TURMAS_SEED[idx].1 {
                ocupacao[idx] += 1;
                Some(idx)
            } else {
                None
            };
            AlunoSeed {
                nome: format!("{} Silva", nome),
                data_nascimento: data_aleatoria(rng, 2005, 2019),
                email: format!("{}.{}@escola.test", nome.to_lowercase(), i),
                turma,
            }
        })
        .collect()
}

pub async fn executar_seed(db_pool: &SqlitePool) -> AppResult<()> {
    tracing::info!("🌱 Executando seed de dados de demonstração...");

    // O ThreadRng não é Send: gerar tudo antes do primeiro await
    let alunos = {
        let mut rng = rand::thread_rng();
        gerar_alunos(&mut rng)
    };

    let mut tx = db_pool.begin().await?;

    sqlx::query("DELETE FROM alunos").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM turmas").execute(&mut *tx).await?;

    let mut turma_ids = Vec::with_capacity(TURMAS_SEED.len());
    for (nome, capacidade) in TURMAS_SEED {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO turmas (nome, capacidade) VALUES (?1, ?2)
            RETURNING id
            "#,
        )
        .bind(*nome)
        .bind(*capacidade)
        .fetch_one(&mut *tx)
        .await?;
        turma_ids.push(id);
    }

    for aluno in &alunos {
        let turma_id = aluno.turma.map(|idx| turma_ids[idx]);
        let status = if turma_id.is_some() {
            STATUS_ATIVO
        } else {
            STATUS_INATIVO
        };
        sqlx::query(
            r#"
            INSERT INTO alunos (nome, data_nascimento, email, status, turma_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&aluno.nome)
        .bind(aluno.data_nascimento)
        .bind(&aluno.email)
        .bind(status)
        .bind(turma_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        "✅ Seed concluído: {} turmas, {} alunos ({} matriculados).",
        turma_ids.len(),
        alunos.len(),
        alunos.iter().filter(|a| a.turma.is_some()).count()
    );
    Ok(())
}
