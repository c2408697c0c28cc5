use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{AppState, CurrentSession},
    error::AppResult,
    models::{QuizQuestion, SessionState},
};

use super::RESULTS_PATH;

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub total_questions: usize,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub option: usize,
}

#[derive(Debug, Serialize)]
pub struct QuizProgress {
    pub answered: usize,
    pub total_questions: usize,
    pub next_question: Option<usize>,
    pub complete: bool,
}

impl QuizProgress {
    fn of(session: &SessionState, quiz: &[QuizQuestion]) -> Self {
        let next_question = session.next_question(quiz);
        Self {
            answered: session.answers.len(),
            total_questions: quiz.len(),
            next_question,
            complete: next_question.is_none(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentQuestion<'a> {
    pub question_num: usize,
    pub total_questions: usize,
    pub question: &'a QuizQuestion,
}

/// Lists every question with its option texts
pub async fn get_quiz(State(state): State<AppState>) -> Json<QuizResponse> {
    Json(QuizResponse {
        total_questions: state.quiz.len(),
        questions: state.quiz.as_ref().clone(),
    })
}

/// Clears previous answers and the recommendation feed
pub async fn start_quiz(
    State(state): State<AppState>,
    CurrentSession(mut session): CurrentSession,
) -> AppResult<Json<QuizProgress>> {
    session.start_quiz();
    state.sessions.save(&session).await?;

    tracing::info!(user_id = ?session.user_id, "Quiz started");

    Ok(Json(QuizProgress::of(&session, &state.quiz)))
}

/// The question awaiting an answer; once all are answered, redirects to the results
pub async fn current_question(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Response {
    match session.next_question(&state.quiz) {
        Some(idx) => Json(CurrentQuestion {
            question_num: idx,
            total_questions: state.quiz.len(),
            question: &state.quiz[idx],
        })
        .into_response(),
        None => Redirect::to(RESULTS_PATH).into_response(),
    }
}

/// Records the answer to the current question
pub async fn submit_answer(
    State(state): State<AppState>,
    CurrentSession(mut session): CurrentSession,
    Json(request): Json<AnswerRequest>,
) -> AppResult<Json<QuizProgress>> {
    session.record_answer(request.option, &state.quiz)?;
    state.sessions.save(&session).await?;

    tracing::debug!(
        user_id = ?session.user_id,
        answered = session.answers.len(),
        option = request.option,
        "Answer recorded"
    );

    Ok(Json(QuizProgress::of(&session, &state.quiz)))
}
