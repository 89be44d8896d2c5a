// src/web/routes.rs
use crate::{
    state::AppState,
    web::{aluno_handlers, matricula_handlers, sistema_handlers, turma_handlers},
};
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Alunos ---
    let aluno_routes = Router::new()
        .route(
            "/alunos",
            get(aluno_handlers::list_alunos).post(aluno_handlers::create_aluno),
        )
        .route(
            "/alunos/{id}",
            get(aluno_handlers::get_aluno)
                .put(aluno_handlers::update_aluno)
                .delete(aluno_handlers::delete_aluno),
        );

    // --- Turmas ---
    let turma_routes = Router::new()
        .route(
            "/turmas",
            get(turma_handlers::list_turmas).post(turma_handlers::create_turma),
        )
        .route("/turmas/{id}", get(turma_handlers::get_turma));

    // --- Matrículas e sistema ---
    let outras_routes = Router::new()
        .route("/matriculas", post(matricula_handlers::handle_matricula))
        .route("/health", get(sistema_handlers::health))
        .route("/seed", post(sistema_handlers::handle_seed));

    Router::new()
        .merge(aluno_routes)
        .merge(turma_routes)
        .merge(outras_routes)
        .with_state(app_state)
}
