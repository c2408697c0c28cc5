//! Movie catalog abstraction
//!
//! The recommendation flow only needs a handful of read operations from the
//! external catalog. Every list operation degrades to an empty page instead of
//! failing, so callers never abort a request because the catalog misbehaved.
use crate::models::{Movie, MovieDetails, PreferenceSpec};

pub mod tmdb;

/// Most results kept from one page of the popular listing
pub const POPULAR_RESULTS_LIMIT: usize = 10;

/// Most results kept from one page of a filtered discover query
pub const DISCOVER_RESULTS_LIMIT: usize = 8;

/// Most results kept from a title search
pub const SEARCH_RESULTS_LIMIT: usize = 20;

/// Outcome of fetching one page from the catalog
///
/// `Exhausted` and `SourceFailed` both carry no movies. They are kept apart so
/// logs and callers can tell "nothing left" from "ask again later", even
/// though the feed treats both as the end of paging.
#[derive(Debug, Clone, PartialEq)]
pub enum PageFetch {
    Movies(Vec<Movie>),
    Exhausted,
    SourceFailed(String),
}

impl PageFetch {
    /// Wraps a result list, mapping an empty list to `Exhausted`
    pub fn from_results(movies: Vec<Movie>) -> Self {
        if movies.is_empty() {
            PageFetch::Exhausted
        } else {
            PageFetch::Movies(movies)
        }
    }

    /// Collapses the outcome into a plain list
    pub fn into_movies(self) -> Vec<Movie> {
        match self {
            PageFetch::Movies(movies) => movies,
            PageFetch::Exhausted | PageFetch::SourceFailed(_) => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !matches!(self, PageFetch::Movies(movies) if !movies.is_empty())
    }
}

/// Trait for movie catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// One page of the unfiltered popular listing, at most [`POPULAR_RESULTS_LIMIT`] movies
    async fn popular(&self, page: u32) -> PageFetch;

    /// One page of movies matching the preferences, at most [`DISCOVER_RESULTS_LIMIT`] movies
    async fn discover(&self, preferences: &PreferenceSpec, page: u32) -> PageFetch;

    /// Title search, at most [`SEARCH_RESULTS_LIMIT`] movies
    async fn search(&self, query: &str) -> PageFetch;

    /// Full record of one movie; `None` when unknown or unavailable
    async fn movie_details(&self, movie_id: i64) -> Option<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            overview: None,
            poster_path: None,
            release_date: None,
            vote_average: None,
            genre_ids: Vec::new(),
        }
    }

    #[test]
    fn test_from_results() {
        assert_eq!(PageFetch::from_results(vec![]), PageFetch::Exhausted);
        assert_eq!(
            PageFetch::from_results(vec![movie(1)]),
            PageFetch::Movies(vec![movie(1)])
        );
    }

    #[test]
    fn test_into_movies_conflates_empty_outcomes() {
        assert!(PageFetch::Exhausted.into_movies().is_empty());
        assert!(PageFetch::SourceFailed("503".into()).into_movies().is_empty());
        assert_eq!(PageFetch::Movies(vec![movie(7)]).into_movies().len(), 1);
    }

    #[test]
    fn test_is_empty() {
        assert!(PageFetch::Exhausted.is_empty());
        assert!(PageFetch::SourceFailed("timeout".into()).is_empty());
        assert!(PageFetch::Movies(vec![]).is_empty());
        assert!(!PageFetch::Movies(vec![movie(1)]).is_empty());
    }
}
