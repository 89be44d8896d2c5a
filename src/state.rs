// src/state.rs
use sqlx::SqlitePool;

/// Estado partilhado pelos handlers; o pool é aberto uma vez no arranque.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
}

impl AppState {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}
