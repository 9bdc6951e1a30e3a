use crate::auth::repo::{PgUserRepository, UserRepository};
use crate::config::AppConfig;
use crate::memory::InMemoryStore;
use crate::todos::repo::{PgTodoRepository, TodoRepository};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub todos: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn postgres(config: AppConfig, db: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            users: Arc::new(PgUserRepository { db: db.clone() }),
            todos: Arc::new(PgTodoRepository { db }),
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryStore::default());
        Self {
            config: Arc::new(config),
            users: store.clone(),
            todos: store,
        }
    }
}
