use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use super::AppState;
use crate::{
    error::AppError,
    models::{SessionState, UserId},
};

/// Header carrying the session token
pub const SESSION_HEADER: &str = "x-session-id";

fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(SESSION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// The live session named by the `x-session-id` header
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionState);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = session_id(&parts.headers).ok_or_else(|| {
            AppError::Unauthorized(format!("Missing or malformed {} header", SESSION_HEADER))
        })?;

        let session = state
            .sessions
            .load(id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Session expired or unknown".to_string()))?;

        Ok(CurrentSession(session))
    }
}

/// A live session bound to a logged-in user
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub session: SessionState,
    pub user_id: UserId,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;

        match session.user_id {
            Some(user_id) => Ok(AuthenticatedSession { session, user_id }),
            None => Err(AppError::Unauthorized("Login required".to_string())),
        }
    }
}
