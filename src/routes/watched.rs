use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{
    api::{AppState, AuthenticatedSession},
    error::AppResult,
    models::{MarkWatchedRequest, MovieId, WatchedMovie},
    services::watched::UNKNOWN_MOVIE_TITLE,
};

#[derive(Debug, Serialize)]
pub struct MarkWatchedResponse {
    pub movie_id: MovieId,
    /// `false` when the movie was already in the list
    pub newly_marked: bool,
}

pub async fn mark_watched(
    State(state): State<AppState>,
    auth: AuthenticatedSession,
    Path(movie_id): Path<MovieId>,
    body: Option<Json<MarkWatchedRequest>>,
) -> AppResult<Json<MarkWatchedResponse>> {
    let Json(request) = body.unwrap_or_default();
    let title = request
        .movie_title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_MOVIE_TITLE.to_string());
    let poster = request.movie_poster.unwrap_or_default();

    let newly_marked = state
        .watched
        .mark_watched(auth.user_id, movie_id, &title, &poster)
        .await?;

    tracing::info!(user_id = auth.user_id, movie_id, newly_marked, "Movie marked watched");

    Ok(Json(MarkWatchedResponse {
        movie_id,
        newly_marked,
    }))
}

/// The user's watched list, most recent first
pub async fn list_watched(
    State(state): State<AppState>,
    auth: AuthenticatedSession,
) -> AppResult<Json<Vec<WatchedMovie>>> {
    Ok(Json(state.watched.list(auth.user_id).await?))
}
