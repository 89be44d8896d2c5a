// src/models/aluno.rs
use crate::error::{AppError, AppResult};
use crate::models::de;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const STATUS_ATIVO: &str = "ativo";
pub const STATUS_INATIVO: &str = "inativo";

/// Idade mínima (em anos completos) para registar um aluno.
pub const IDADE_MINIMA: u32 = 5;

// Representa uma linha da tabela 'alunos'
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Aluno {
    pub id: i64,
    pub nome: String,
    pub data_nascimento: NaiveDate, // TEXT "YYYY-MM-DD" na DB
    pub email: Option<String>,
    pub status: String,
    pub turma_id: Option<i64>,
}

fn status_padrao() -> String {
    STATUS_INATIVO.to_string()
}

/// Corpo de POST /alunos e PUT /alunos/{id}.
///
/// No PUT todos os campos substituem os guardados: um campo omitido
/// assume o valor por omissão (email e turma_id `None`, status "inativo").
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AlunoInput {
    #[serde(deserialize_with = "de::trimmed")]
    #[validate(length(min = 3, max = 80, message = "nome deve ter entre 3 e 80 caracteres"))]
    pub nome: String,

    pub data_nascimento: NaiveDate,

    #[serde(default, deserialize_with = "de::opcional_trimmed")]
    #[validate(email(message = "email inválido"))]
    pub email: Option<String>,

    #[serde(default = "status_padrao", deserialize_with = "de::trimmed")]
    #[validate(length(min = 1, max = 20, message = "status deve ter entre 1 e 20 caracteres"))]
    pub status: String,

    #[serde(default)]
    #[validate(range(min = 1, message = "turma_id inválido"))]
    pub turma_id: Option<i64>,
}

impl AlunoInput {
    /// Regra da idade mínima, avaliada contra a data `hoje` fornecida.
    pub fn validar_idade_minima(&self, hoje: NaiveDate) -> AppResult<()> {
        match idade_em_anos(self.data_nascimento, hoje) {
            Some(idade) if idade >= IDADE_MINIMA => Ok(()),
            Some(_) => Err(AppError::Validacao(format!(
                "Aluno deve ter pelo menos {} anos",
                IDADE_MINIMA
            ))),
            None => Err(AppError::Validacao(
                "data_nascimento não pode ser no futuro".to_string(),
            )),
        }
    }
}

/// Anos completos entre `nascimento` e `hoje`; `None` se nascer no futuro.
/// Conta por calendário: no 5º aniversário a idade já é 5.
pub fn idade_em_anos(nascimento: NaiveDate, hoje: NaiveDate) -> Option<u32> {
    hoje.years_since(nascimento)
}

/// Filtros de GET /alunos.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlunoFiltro {
    #[serde(default, deserialize_with = "de::vazio_como_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "de::vazio_como_none")]
    pub turma_id: Option<i64>,
    #[serde(default, deserialize_with = "de::vazio_como_none")]
    pub status: Option<String>,
}
