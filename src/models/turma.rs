// src/models/turma.rs
use crate::models::de;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// Representa uma linha da tabela 'turmas'
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Turma {
    pub id: i64,
    pub nome: String, // UNIQUE na DB
    pub capacidade: i64,
}

/// Corpo de POST /turmas.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TurmaInput {
    #[serde(deserialize_with = "de::trimmed")]
    #[validate(length(min = 1, max = 80, message = "nome deve ter entre 1 e 80 caracteres"))]
    pub nome: String,

    #[validate(range(min = 1, message = "capacidade deve ser pelo menos 1"))]
    pub capacidade: i64,
}

/// Turma com a ocupação atual (GET /turmas/{id}).
#[derive(Debug, Clone, Serialize)]
pub struct TurmaDetalhe {
    #[serde(flatten)]
    pub turma: Turma,
    pub ocupacao: i64,
    pub vagas: i64,
}

impl TurmaDetalhe {
    pub fn new(turma: Turma, ocupacao: i64) -> Self {
        let vagas = (turma.capacidade - ocupacao).max(0);
        Self {
            turma,
            ocupacao,
            vagas,
        }
    }
}
