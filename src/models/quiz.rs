use serde::Serialize;

use super::SortOrder;

/// TMDB genre identifier
pub type GenreId = u32;

/// One selectable answer of a quiz question
///
/// An option contributes `weight` to each of its genres and may pin any of
/// the scalar filters of the preference specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizOption {
    pub text: String,
    #[serde(skip)]
    pub genres: Vec<GenreId>,
    /// Weight added to every genre of this option; `None` counts as 1
    #[serde(skip)]
    pub weight: Option<i32>,
    #[serde(skip)]
    pub min_year: Option<i32>,
    #[serde(skip)]
    pub max_year: Option<i32>,
    #[serde(skip)]
    pub min_runtime: Option<u32>,
    #[serde(skip)]
    pub max_runtime: Option<u32>,
    #[serde(skip)]
    pub min_rating: Option<f64>,
    #[serde(skip)]
    pub sort: Option<SortOrder>,
}

impl QuizOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            genres: Vec::new(),
            weight: None,
            min_year: None,
            max_year: None,
            min_runtime: None,
            max_runtime: None,
            min_rating: None,
            sort: None,
        }
    }

    pub fn genres(mut self, genres: &[GenreId]) -> Self {
        self.genres = genres.to_vec();
        self
    }

    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn years(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_year = min;
        self.max_year = max;
        self
    }

    pub fn runtime(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_runtime = min;
        self.max_runtime = max;
        self
    }

    pub fn min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Effective weight of this option's genre votes
    pub fn genre_weight(&self) -> i32 {
        self.weight.unwrap_or(1)
    }
}

/// A fixed quiz question with its ordered options
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<QuizOption>,
}

impl QuizQuestion {
    pub fn new(question: impl Into<String>, options: Vec<QuizOption>) -> Self {
        Self {
            question: question.into(),
            options,
        }
    }
}

/// The question set served by the quiz, built once at startup
pub fn standard_quiz() -> Vec<QuizQuestion> {
    vec![
        QuizQuestion::new(
            "What's your ideal Friday night?",
            vec![
                QuizOption::new("Intense action and explosions").genres(&[28]).weight(2),
                QuizOption::new("Laughing with friends").genres(&[35]).weight(2),
                QuizOption::new("Deep emotional story").genres(&[18]).weight(2),
                QuizOption::new("Getting scared").genres(&[27]).weight(2),
            ],
        ),
        QuizQuestion::new(
            "How much time do you have?",
            vec![
                QuizOption::new("Quick watch (under 90 min)")
                    .runtime(None, Some(90))
                    .weight(1),
                QuizOption::new("Standard movie (90-120 min)")
                    .runtime(Some(90), Some(120))
                    .weight(1),
                QuizOption::new("Epic experience (2+ hours)")
                    .runtime(Some(120), None)
                    .weight(1),
                QuizOption::new("I don't care about length").weight(0),
            ],
        ),
        QuizQuestion::new(
            "What era appeals to you?",
            vec![
                QuizOption::new("Classic films (before 1980)")
                    .years(None, Some(1979))
                    .weight(1),
                QuizOption::new("80s & 90s nostalgia")
                    .years(Some(1980), Some(1999))
                    .weight(1),
                QuizOption::new("Modern movies (2000s-2010s)")
                    .years(Some(2000), Some(2019))
                    .weight(1),
                QuizOption::new("Latest releases (2020+)")
                    .years(Some(2020), None)
                    .weight(1),
            ],
        ),
        QuizQuestion::new(
            "What kind of quality are you looking for?",
            vec![
                QuizOption::new("Critically acclaimed (8+ rating)")
                    .min_rating(8.0)
                    .sort(SortOrder::VoteAverageDesc)
                    .weight(1),
                QuizOption::new("Popular crowd-pleasers")
                    .sort(SortOrder::PopularityDesc)
                    .weight(1),
                QuizOption::new("Hidden gems (fewer votes)")
                    .sort(SortOrder::VoteCountAsc)
                    .weight(1),
                QuizOption::new("I'm not picky").weight(0),
            ],
        ),
        QuizQuestion::new(
            "What setting excites you most?",
            vec![
                QuizOption::new("Space and future").genres(&[878]).weight(1),
                QuizOption::new("Fantasy worlds").genres(&[14]).weight(1),
                QuizOption::new("Real world drama").genres(&[18]).weight(1),
                QuizOption::new("Crime and mystery").genres(&[80, 9648]).weight(1),
            ],
        ),
        QuizQuestion::new(
            "How do you want to feel afterward?",
            vec![
                QuizOption::new("Pumped and energized").genres(&[28, 12]).weight(2),
                QuizOption::new("Happy and uplifted").genres(&[35, 10751]).weight(2),
                QuizOption::new("Thoughtful and moved").genres(&[18]).weight(2),
                QuizOption::new("Thrilled and tense").genres(&[53, 27]).weight(2),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_quiz_shape() {
        let quiz = standard_quiz();
        assert_eq!(quiz.len(), 6);
        assert!(quiz.iter().all(|q| q.options.len() == 4));
    }

    #[test]
    fn test_default_weight_is_one() {
        let option = QuizOption::new("Anything").genres(&[18]);
        assert_eq!(option.genre_weight(), 1);
        assert_eq!(option.clone().weight(0).genre_weight(), 0);
    }

    #[test]
    fn test_serialization_hides_scoring_fields() {
        let question = &standard_quiz()[0];
        let json = serde_json::to_value(question).unwrap();
        assert_eq!(json["question"], "What's your ideal Friday night?");
        assert_eq!(json["options"][0], serde_json::json!({ "text": "Intense action and explosions" }));
    }
}
