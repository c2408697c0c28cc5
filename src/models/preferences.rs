use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::GenreId;

/// Sort orders understood by the discover endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "vote_average.desc")]
    VoteAverageDesc,
    #[serde(rename = "vote_count.asc")]
    VoteCountAsc,
}

impl SortOrder {
    /// Token sent as `sort_by`
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::PopularityDesc => "popularity.desc",
            SortOrder::VoteAverageDesc => "vote_average.desc",
            SortOrder::VoteCountAsc => "vote_count.asc",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters and sort derived from a set of quiz answers
///
/// `genres` holds at most three ids, strongest first. An empty list means
/// no genre filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceSpec {
    pub genres: Vec<GenreId>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_runtime: Option<u32>,
    pub max_runtime: Option<u32>,
    pub min_rating: Option<f64>,
    pub sort_by: SortOrder,
}

impl PreferenceSpec {
    /// True when no answer narrowed the search
    pub fn is_unfiltered(&self) -> bool {
        self.genres.is_empty()
            && self.min_year.is_none()
            && self.max_year.is_none()
            && self.min_runtime.is_none()
            && self.max_runtime.is_none()
            && self.min_rating.is_none()
    }
}
