use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::{Cache, CacheKey},
    error::AppResult,
    models::SessionState,
};

/// Storage for per-visitor quiz sessions
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: Uuid) -> AppResult<Option<SessionState>>;

    /// Inserts or replaces the session
    async fn save(&self, session: &SessionState) -> AppResult<()>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Sessions kept in Redis as JSON, expiring `ttl` seconds after the last write
#[derive(Clone)]
pub struct RedisSessionStore {
    cache: Cache,
    ttl: u64,
}

impl RedisSessionStore {
    pub fn new(cache: Cache, ttl: u64) -> Self {
        Self { cache, ttl }
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: Uuid) -> AppResult<Option<SessionState>> {
        self.cache.get_from_cache(&CacheKey::Session(id)).await
    }

    async fn save(&self, session: &SessionState) -> AppResult<()> {
        self.cache
            .set(&CacheKey::Session(session.id), session, self.ttl)
            .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.cache.delete(&CacheKey::Session(id)).await
    }
}

/// Process-local sessions without expiry
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, SessionState>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: Uuid) -> AppResult<Option<SessionState>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn save(&self, session: &SessionState) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        tokio_test::block_on(async {
            let store = MemorySessionStore::new();
            let mut session = SessionState::new();
            session.answers = vec![0, 2];

            store.save(&session).await.unwrap();
            assert_eq!(store.load(session.id).await.unwrap(), Some(session.clone()));

            session.answers.push(1);
            store.save(&session).await.unwrap();
            assert_eq!(store.load(session.id).await.unwrap().unwrap().answers, vec![0, 2, 1]);

            store.delete(session.id).await.unwrap();
            assert_eq!(store.load(session.id).await.unwrap(), None);
        });
    }

    #[test]
    fn test_session_json_round_trip() {
        let mut session = SessionState::new();
        session.user_id = Some(7);
        session.preferences = Some(crate::models::PreferenceSpec {
            genres: vec![28, 12],
            min_rating: Some(8.0),
            ..Default::default()
        });
        session.feed.shown_movies = vec![603, 604];

        let json = serde_json::to_string(&session).unwrap();
        let restored: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }
}
