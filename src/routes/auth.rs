use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{AppState, CurrentSession},
    error::AppResult,
    models::{LoginRequest, RegisterRequest, SessionState, User},
    services::accounts,
};

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub session_id: Uuid,
    pub user: User,
}

/// Creates an anonymous session
pub async fn create_session(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<CreateSessionResponse>)> {
    let session = SessionState::new();
    state.sessions.save(&session).await?;

    tracing::info!("Anonymous session created");

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id,
        }),
    ))
}

/// Binds `user` to the caller's session, keeping its quiz progress, or to a fresh one
async fn sign_in(
    state: &AppState,
    current: Option<CurrentSession>,
    user: User,
) -> AppResult<AuthResponse> {
    let mut session = current
        .map(|CurrentSession(session)| session)
        .unwrap_or_else(SessionState::new);
    session.user_id = Some(user.id);
    state.sessions.save(&session).await?;

    Ok(AuthResponse {
        session_id: session.id,
        user,
    })
}

pub async fn register(
    State(state): State<AppState>,
    current: Option<CurrentSession>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let user = accounts::register(state.users.as_ref(), request).await?;

    let response = sign_in(&state, current, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    current: Option<CurrentSession>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = accounts::login(state.users.as_ref(), request).await?;

    Ok(Json(sign_in(&state, current, user).await?))
}

/// Ends the session entirely, quiz progress included
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<StatusCode> {
    state.sessions.delete(session.id).await?;

    tracing::info!(user_id = ?session.user_id, "Session ended");

    Ok(StatusCode::NO_CONTENT)
}
