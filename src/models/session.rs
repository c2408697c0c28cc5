use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MovieId, PreferenceSpec, QuizQuestion, UserId};
use crate::error::{AppError, AppResult, QuizError};

/// Position of a session in its recommendation feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCursor {
    /// Movies already presented, in presentation order, without duplicates
    pub shown_movies: Vec<MovieId>,
    /// Last discover page consumed
    pub current_page: u32,
}

impl Default for FeedCursor {
    fn default() -> Self {
        Self {
            shown_movies: Vec::new(),
            current_page: 1,
        }
    }
}

/// Everything the service remembers about one visitor between requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub id: Uuid,
    pub user_id: Option<UserId>,
    pub answers: Vec<usize>,
    pub preferences: Option<PreferenceSpec>,
    pub feed: FeedCursor,
    pub created_at: DateTime<Utc>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Creates a fresh anonymous session
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            answers: Vec::new(),
            preferences: None,
            feed: FeedCursor::default(),
            created_at: Utc::now(),
        }
    }

    /// Clears answers and the feed so the quiz can be taken again
    pub fn start_quiz(&mut self) {
        self.answers.clear();
        self.feed = FeedCursor::default();
    }

    /// Index of the question awaiting an answer, `None` once all are answered
    pub fn next_question(&self, quiz: &[QuizQuestion]) -> Option<usize> {
        let next = self.answers.len();
        (next < quiz.len()).then_some(next)
    }

    /// Appends the answer to the current question
    ///
    /// Returns the index of the following question, or `None` when the
    /// quiz is complete.
    pub fn record_answer(&mut self, option: usize, quiz: &[QuizQuestion]) -> AppResult<Option<usize>> {
        let question_idx = self
            .next_question(quiz)
            .ok_or(QuizError::AlreadyComplete { total: quiz.len() })?;

        let available = quiz[question_idx].options.len();
        if option >= available {
            return Err(AppError::InvalidInput(format!(
                "Option {} does not exist for question {} ({} options)",
                option, question_idx, available
            )));
        }

        self.answers.push(option);
        Ok(self.next_question(quiz))
    }
}
