// src/models/mod.rs
pub mod aluno;
pub mod de;
pub mod matricula;
pub mod turma;
