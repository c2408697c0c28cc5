use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::Serialize;

use crate::{
    api::{AppState, CurrentSession},
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Movie, PreferenceSpec},
    services::{feed, preferences, watched::watched_ids_for},
};

use super::QUIZ_PATH;

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub preferences: PreferenceSpec,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub movies: Vec<Movie>,
    /// The feed ran out of unseen movies and started over
    pub restarted: bool,
}

/// Scores the session's answers and returns the first recommendations
pub async fn results(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    CurrentSession(mut session): CurrentSession,
) -> AppResult<Response> {
    if session.answers.is_empty() {
        return Ok(Redirect::to(QUIZ_PATH).into_response());
    }

    let prefs = preferences::aggregate(&state.quiz, &session.answers)?;

    tracing::info!(
        request_id = %request_id,
        genres = ?prefs.genres,
        sort_by = %prefs.sort_by,
        unfiltered = prefs.is_unfiltered(),
        "Preferences computed"
    );

    let watched = watched_ids_for(state.watched.as_ref(), session.user_id).await?;
    let movies = feed::first_batch(state.catalog.as_ref(), &prefs, &watched).await;

    session.preferences = Some(prefs.clone());
    state.sessions.save(&session).await?;

    Ok(Json(ResultsResponse {
        preferences: prefs,
        movies,
    })
    .into_response())
}

/// Next batch of unseen recommendations without retaking the quiz
pub async fn refresh(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    CurrentSession(mut session): CurrentSession,
) -> AppResult<Response> {
    let Some(prefs) = session.preferences.clone() else {
        return Ok(Redirect::to(QUIZ_PATH).into_response());
    };

    let watched = watched_ids_for(state.watched.as_ref(), session.user_id).await?;
    let cursor = std::mem::take(&mut session.feed);
    let batch = feed::refresh(state.catalog.as_ref(), &prefs, cursor, &watched).await;

    tracing::info!(
        request_id = %request_id,
        movies = batch.movies.len(),
        page = batch.cursor.current_page,
        restarted = batch.restarted,
        "Recommendations refreshed"
    );

    session.feed = batch.cursor;
    state.sessions.save(&session).await?;

    Ok(Json(RefreshResponse {
        movies: batch.movies,
        restarted: batch.restarted,
    })
    .into_response())
}
