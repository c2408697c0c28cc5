use std::collections::HashMap;

use crate::{
    error::QuizError,
    models::{GenreId, PreferenceSpec, QuizOption, QuizQuestion},
};

/// Number of genres kept in a preference specification
pub const TOP_GENRES: usize = 3;

/// Running genre score accumulated over quiz answers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreTally {
    scores: HashMap<GenreId, i32>,
}

impl GenreTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `weight` to every genre in `genres`
    pub fn add(&mut self, genres: &[GenreId], weight: i32) {
        for genre in genres {
            *self.scores.entry(*genre).or_insert(0) += weight;
        }
    }

    pub fn score(&self, genre: GenreId) -> Option<i32> {
        self.scores.get(&genre).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// The `n` highest scoring genres, best first; equal scores order by ascending id
    pub fn top(&self, n: usize) -> Vec<GenreId> {
        let mut ranked: Vec<(GenreId, i32)> = self.scores.iter().map(|(g, s)| (*g, *s)).collect();
        ranked.sort_by(|(a_id, a_score), (b_id, b_score)| {
            b_score.cmp(a_score).then_with(|| a_id.cmp(b_id))
        });
        ranked.into_iter().take(n).map(|(genre, _)| genre).collect()
    }
}

/// Applies the scalar filters of an option; later answers overwrite earlier ones
fn apply_filters(prefs: &mut PreferenceSpec, option: &QuizOption) {
    if let Some(min_year) = option.min_year {
        prefs.min_year = Some(min_year);
    }
    if let Some(max_year) = option.max_year {
        prefs.max_year = Some(max_year);
    }
    if let Some(min_runtime) = option.min_runtime {
        prefs.min_runtime = Some(min_runtime);
    }
    if let Some(max_runtime) = option.max_runtime {
        prefs.max_runtime = Some(max_runtime);
    }
    if let Some(min_rating) = option.min_rating {
        prefs.min_rating = Some(min_rating);
    }
    if let Some(sort) = option.sort {
        prefs.sort_by = sort;
    }
}

/// Scores the answers against the quiz and returns the tally with the resulting preferences
///
/// Answers past the last question are ignored. An option index that does
/// not exist on its question is reported as [`QuizError::OptionOutOfRange`].
pub fn score_answers(
    quiz: &[QuizQuestion],
    answers: &[usize],
) -> Result<(GenreTally, PreferenceSpec), QuizError> {
    let mut tally = GenreTally::new();
    let mut prefs = PreferenceSpec::default();

    for (question_idx, (question, &answer)) in quiz.iter().zip(answers).enumerate() {
        let option = question
            .options
            .get(answer)
            .ok_or(QuizError::OptionOutOfRange {
                question: question_idx,
                option: answer,
                available: question.options.len(),
            })?;

        tally.add(&option.genres, option.genre_weight());
        apply_filters(&mut prefs, option);
    }

    if answers.len() > quiz.len() {
        tracing::warn!(
            answers = answers.len(),
            questions = quiz.len(),
            "Ignoring answers beyond the last question"
        );
    }

    if !tally.is_empty() {
        prefs.genres = tally.top(TOP_GENRES);
    }

    Ok((tally, prefs))
}

/// Builds the preference specification for a session's answers
pub fn aggregate(quiz: &[QuizQuestion], answers: &[usize]) -> Result<PreferenceSpec, QuizError> {
    score_answers(quiz, answers).map(|(_, prefs)| prefs)
}
