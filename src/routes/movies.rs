use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{AppState, AuthenticatedSession, CurrentSession},
    error::{AppError, AppResult},
    models::{Movie, MovieDetails, MovieId},
    services::{feed, watched::watched_ids_for},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
pub struct MovieDetailsResponse {
    #[serde(flatten)]
    pub movie: MovieDetails,
    pub is_watched: bool,
}

/// Popular movies the logged-in user has not watched yet
pub async fn popular(
    State(state): State<AppState>,
    auth: AuthenticatedSession,
) -> AppResult<Json<Vec<Movie>>> {
    let watched = state.watched.watched_ids(auth.user_id).await?;
    let movies = feed::popular_unwatched(state.catalog.as_ref(), &watched).await;
    Ok(Json(movies))
}

pub async fn details(
    State(state): State<AppState>,
    current: Option<CurrentSession>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<MovieDetailsResponse>> {
    let movie = state
        .catalog
        .movie_details(movie_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", movie_id)))?;

    let is_watched = match current.and_then(|CurrentSession(session)| session.user_id) {
        Some(user_id) => state.watched.is_watched(user_id, movie_id).await?,
        None => false,
    };

    Ok(Json(MovieDetailsResponse { movie, is_watched }))
}

/// Title search; a logged-in user's watched movies are left out
pub async fn search(
    State(state): State<AppState>,
    current: Option<CurrentSession>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let user_id = current.and_then(|CurrentSession(session)| session.user_id);
    let watched = watched_ids_for(state.watched.as_ref(), user_id).await?;

    let movies = state
        .catalog
        .search(&params.q)
        .await
        .into_movies()
        .into_iter()
        .filter(|movie| !watched.contains(&movie.id))
        .collect();

    Ok(Json(movies))
}
