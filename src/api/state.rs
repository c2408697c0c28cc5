use std::sync::Arc;

use crate::{
    models::{standard_quiz, QuizQuestion},
    services::{
        accounts::{MemoryUserStore, UserStore},
        catalog::CatalogProvider,
        sessions::{MemorySessionStore, SessionStore},
        watched::{MemoryWatchedStore, WatchedStore},
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Quiz questions, fixed for the lifetime of the process
    pub quiz: Arc<Vec<QuizQuestion>>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub sessions: Arc<dyn SessionStore>,
    pub users: Arc<dyn UserStore>,
    pub watched: Arc<dyn WatchedStore>,
}

impl AppState {
    /// Creates the state served with the standard quiz
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
        watched: Arc<dyn WatchedStore>,
    ) -> Self {
        Self {
            quiz: Arc::new(standard_quiz()),
            catalog,
            sessions,
            users,
            watched,
        }
    }

    /// State backed by process-local stores; nothing survives a restart
    pub fn in_memory(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self::new(
            catalog,
            Arc::new(MemorySessionStore::new()),
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryWatchedStore::new()),
        )
    }
}
