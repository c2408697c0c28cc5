use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    api::AppState,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
};

pub mod auth;
pub mod movies;
pub mod quiz;
pub mod results;
pub mod watched;

pub(crate) const QUIZ_PATH: &str = "/api/v1/quiz";
pub(crate) const RESULTS_PATH: &str = "/api/v1/results";

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(auth::create_session))
        // Quiz
        .route("/quiz", get(quiz::get_quiz))
        .route("/quiz/start", post(quiz::start_quiz))
        .route("/quiz/current", get(quiz::current_question))
        .route("/quiz/answers", post(quiz::submit_answer))
        // Recommendations
        .route("/results", get(results::results))
        .route("/results/refresh", get(results::refresh))
        // Catalog
        .route("/movies", get(movies::popular))
        .route("/movies/:id", get(movies::details))
        .route("/movies/:id/watched", post(watched::mark_watched))
        .route("/watched", get(watched::list_watched))
        .route("/search", get(movies::search))
        // Accounts
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
