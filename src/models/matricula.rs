// src/models/matricula.rs
use serde::Deserialize;
use validator::Validate;

/// Corpo de POST /matriculas. Campos em falta ou desconhecidos são rejeitados.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MatriculaPayload {
    #[validate(range(min = 1, message = "aluno_id obrigatório"))]
    pub aluno_id: i64,
    #[validate(range(min = 1, message = "turma_id obrigatório"))]
    pub turma_id: i64,
}
