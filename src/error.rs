// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    // Dados de entrada inválidos (campos, idade mínima, corpo mal formado)
    #[error("{0}")]
    Validacao(String),

    #[error("{0}")]
    NaoEncontrado(String),

    // Violação de unicidade (nome de turma, email de aluno)
    #[error("{0}")]
    Conflito(String),

    #[error("{0}")]
    CapacidadeExcedida(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validacao(_) | AppError::CapacidadeExcedida(_) => StatusCode::BAD_REQUEST,
            AppError::NaoEncontrado(_) => StatusCode::NOT_FOUND,
            AppError::Conflito(_) => StatusCode::CONFLICT,
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Como converter AppError numa resposta HTTP
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        // Erros do cliente são esperados; só os de infraestrutura são "error"
        if status.is_server_error() {
            tracing::error!("Erro processado: {:?}", self);
        } else {
            tracing::warn!("Pedido rejeitado ({}): {}", status.as_u16(), self);
        }

        let detail = match self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                "Erro ao aceder aos dados.".to_string()
            }
            AppError::Validacao(msg)
            | AppError::NaoEncontrado(msg)
            | AppError::Conflito(msg)
            | AppError::CapacidadeExcedida(msg) => msg,
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Verifica se o erro da DB é uma violação de UNIQUE (códigos SQLite 2067 / 1555).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation()
                || db_err
                    .code()
                    .map_or(false, |c| c == "2067" || c == "1555")
        }
        _ => false,
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
