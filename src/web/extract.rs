// src/web/extract.rs
use crate::error::AppError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON desserializado e validado; qualquer falha vira `AppError::Validacao` (400).
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validacao(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::Validacao(mensagem_validacao(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// "campo: mensagem; campo: mensagem", ordenado por campo.
pub fn mensagem_validacao(errors: &ValidationErrors) -> String {
    let mut partes: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(campo, erros)| {
            erros.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", campo, msg)
            })
        })
        .collect();
    partes.sort();
    partes.join("; ")
}
