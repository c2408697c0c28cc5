mod movie;
mod preferences;
mod quiz;
mod session;
mod user;

pub use movie::{Genre, Movie, MovieDetails, MovieId, TmdbListResponse};
pub use preferences::{PreferenceSpec, SortOrder};
pub use quiz::{standard_quiz, GenreId, QuizOption, QuizQuestion};
pub use session::{FeedCursor, SessionState};
pub use user::{LoginRequest, MarkWatchedRequest, RegisterRequest, User, UserId, WatchedMovie};
