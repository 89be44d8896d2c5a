// src/web/mod.rs
pub mod aluno_handlers;
pub mod extract;
pub mod matricula_handlers;
pub mod routes;
pub mod sistema_handlers;
pub mod turma_handlers;
