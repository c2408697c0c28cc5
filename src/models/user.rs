use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::MovieId;

pub type UserId = i64;

/// Account row; the password hash never leaves the server
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A movie the user has marked as seen
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WatchedMovie {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub movie_title: String,
    pub movie_poster: String,
    pub watched_at: DateTime<Utc>,
}

/// Body of a mark-watched request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkWatchedRequest {
    #[serde(default)]
    pub movie_title: Option<String>,
    #[serde(default)]
    pub movie_poster: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
