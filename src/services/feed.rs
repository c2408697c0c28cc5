use std::collections::HashSet;

use crate::{
    models::{FeedCursor, Movie, MovieId, PreferenceSpec},
    services::catalog::{CatalogProvider, PageFetch},
};

/// Movies returned per results or refresh request
pub const FEED_BATCH_SIZE: usize = 8;

/// Pages tried by one refresh before giving up on unseen movies
pub const MAX_PAGE_ATTEMPTS: u32 = 10;

/// Size of the popular listing
pub const POPULAR_LISTING_SIZE: usize = 20;

/// Popular pages read while filling the popular listing
pub const POPULAR_MAX_PAGES: u32 = 5;

/// A batch of recommendations and the cursor to store for the next refresh
#[derive(Debug, Clone, PartialEq)]
pub struct FeedBatch {
    pub movies: Vec<Movie>,
    pub cursor: FeedCursor,
    /// True when no unseen movie was found and the feed restarted at page 1
    pub restarted: bool,
}

/// First recommendations after finishing the quiz: page 1 without watched movies
pub async fn first_batch(
    catalog: &dyn CatalogProvider,
    preferences: &PreferenceSpec,
    watched: &HashSet<MovieId>,
) -> Vec<Movie> {
    catalog
        .discover(preferences, 1)
        .await
        .into_movies()
        .into_iter()
        .filter(|movie| !watched.contains(&movie.id))
        .collect()
}

/// Pages past the cursor until a batch of unseen, unwatched movies is collected
///
/// Paging stops after [`MAX_PAGE_ATTEMPTS`] pages or at the first empty page.
/// If nothing new turned up, the shown set is dropped and the batch is
/// rebuilt from page 1, excluding only watched movies.
pub async fn refresh(
    catalog: &dyn CatalogProvider,
    preferences: &PreferenceSpec,
    cursor: FeedCursor,
    watched: &HashSet<MovieId>,
) -> FeedBatch {
    let shown: HashSet<MovieId> = cursor.shown_movies.iter().copied().collect();
    let mut collected: Vec<Movie> = Vec::new();
    let mut collected_ids: HashSet<MovieId> = HashSet::new();
    let mut page = cursor.current_page;
    let mut attempts = 0;

    while collected.len() < FEED_BATCH_SIZE && attempts < MAX_PAGE_ATTEMPTS {
        attempts += 1;
        page += 1;

        let movies = match catalog.discover(preferences, page).await {
            PageFetch::Movies(movies) => movies,
            PageFetch::Exhausted => {
                tracing::debug!(page = page, attempts = attempts, "Catalog exhausted");
                break;
            }
            PageFetch::SourceFailed(reason) => {
                tracing::warn!(
                    page = page,
                    attempts = attempts,
                    reason = %reason,
                    "Catalog unavailable, stopping refresh"
                );
                break;
            }
        };

        for movie in movies {
            if collected.len() >= FEED_BATCH_SIZE {
                break;
            }
            if shown.contains(&movie.id)
                || watched.contains(&movie.id)
                || !collected_ids.insert(movie.id)
            {
                continue;
            }
            collected.push(movie);
        }
    }

    if collected.is_empty() {
        tracing::info!(
            attempts = attempts,
            last_page = page,
            "No unseen movies left, restarting feed from page 1"
        );
        return restart(catalog, preferences, watched).await;
    }

    let mut shown_movies = cursor.shown_movies;
    shown_movies.extend(collected.iter().map(|movie| movie.id));

    tracing::info!(
        new_movies = collected.len(),
        attempts = attempts,
        page = page,
        "Feed refreshed"
    );

    FeedBatch {
        movies: collected,
        cursor: FeedCursor {
            shown_movies,
            current_page: page,
        },
        restarted: false,
    }
}

async fn restart(
    catalog: &dyn CatalogProvider,
    preferences: &PreferenceSpec,
    watched: &HashSet<MovieId>,
) -> FeedBatch {
    let movies: Vec<Movie> = first_batch(catalog, preferences, watched)
        .await
        .into_iter()
        .take(FEED_BATCH_SIZE)
        .collect();

    FeedBatch {
        cursor: FeedCursor {
            shown_movies: movies.iter().map(|movie| movie.id).collect(),
            current_page: 1,
        },
        movies,
        restarted: true,
    }
}

/// Up to [`POPULAR_LISTING_SIZE`] popular movies the user has not watched
pub async fn popular_unwatched(
    catalog: &dyn CatalogProvider,
    watched: &HashSet<MovieId>,
) -> Vec<Movie> {
    let mut movies = Vec::new();

    for page in 1..=POPULAR_MAX_PAGES {
        let fetched = catalog.popular(page).await;
        if fetched.is_empty() {
            break;
        }

        for movie in fetched.into_movies() {
            if movies.len() >= POPULAR_LISTING_SIZE {
                return movies;
            }
            if !watched.contains(&movie.id) {
                movies.push(movie);
            }
        }
    }

    movies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::MockCatalogProvider;
    use mockall::predicate::eq;

    fn movie(id: MovieId) -> Movie {
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

    /// Page `n` holds movies `n*100 + 1 ..= n*100 + 8`
    fn page_of(page: u32) -> Vec<Movie> {
        let base = page as i64 * 100;
        (1..=8).map(|i| movie(base + i)).collect()
    }

    fn ids(movies: &[Movie]) -> Vec<MovieId> {
        movies.iter().map(|m| m.id).collect()
    }

    fn paging_catalog(last_page: u32) -> MockCatalogProvider {
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_discover().returning(move |_, page| {
            if page <= last_page {
                PageFetch::Movies(page_of(page))
            } else {
                PageFetch::Exhausted
            }
        });
        catalog
    }

    #[tokio::test]
    async fn test_first_batch_filters_watched() {
        let catalog = paging_catalog(3);
        let watched: HashSet<MovieId> = [102, 105].into_iter().collect();

        let movies = first_batch(&catalog, &PreferenceSpec::default(), &watched).await;
        assert_eq!(ids(&movies), vec![101, 103, 104, 106, 107, 108]);
    }

    #[tokio::test]
    async fn test_refresh_takes_next_page() {
        let catalog = paging_catalog(10);

        let batch = refresh(
            &catalog,
            &PreferenceSpec::default(),
            FeedCursor::default(),
            &HashSet::new(),
        )
        .await;

        assert_eq!(ids(&batch.movies), ids(&page_of(2)));
        assert_eq!(batch.cursor.current_page, 2);
        assert_eq!(batch.cursor.shown_movies, ids(&page_of(2)));
        assert!(!batch.restarted);
    }

    #[tokio::test]
    async fn test_refresh_skips_pages_already_shown() {
        let catalog = paging_catalog(10);
        let shown: Vec<MovieId> = (2..=4).flat_map(|p| ids(&page_of(p))).collect();
        let cursor = FeedCursor {
            shown_movies: shown.clone(),
            current_page: 1,
        };

        let batch = refresh(&catalog, &PreferenceSpec::default(), cursor, &HashSet::new()).await;

        assert_eq!(ids(&batch.movies), ids(&page_of(5)));
        assert_eq!(batch.cursor.current_page, 5);
        assert_eq!(batch.cursor.shown_movies.len(), shown.len() + 8);
        assert_eq!(&batch.cursor.shown_movies[..shown.len()], &shown[..]);
    }

    #[tokio::test]
    async fn test_refresh_fills_batch_across_pages() {
        let catalog = paging_catalog(10);
        // half of page 2 already shown, half of page 3 watched
        let cursor = FeedCursor {
            shown_movies: vec![201, 202, 203, 204],
            current_page: 1,
        };
        let watched: HashSet<MovieId> = [301, 302, 303, 304].into_iter().collect();

        let batch = refresh(&catalog, &PreferenceSpec::default(), cursor, &watched).await;

        assert_eq!(ids(&batch.movies), vec![205, 206, 207, 208, 305, 306, 307, 308]);
        assert_eq!(batch.cursor.current_page, 3);
    }

    #[tokio::test]
    async fn test_refresh_gives_up_after_attempt_budget() {
        let mut catalog = MockCatalogProvider::new();
        // every page repeats the same movies
        catalog
            .expect_discover()
            .times(MAX_PAGE_ATTEMPTS as usize + 1)
            .returning(|_, _| PageFetch::Movies(page_of(1)));

        let cursor = FeedCursor {
            shown_movies: ids(&page_of(1)),
            current_page: 1,
        };

        let batch = refresh(&catalog, &PreferenceSpec::default(), cursor, &HashSet::new()).await;

        assert!(batch.restarted);
        assert_eq!(ids(&batch.movies), ids(&page_of(1)));
        assert_eq!(batch.cursor.current_page, 1);
        assert_eq!(batch.cursor.shown_movies, ids(&page_of(1)));
    }

    #[tokio::test]
    async fn test_refresh_restarts_when_source_is_empty() {
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_discover().returning(|_, page| {
            if page == 1 {
                PageFetch::Movies(page_of(1))
            } else {
                PageFetch::Exhausted
            }
        });

        let cursor = FeedCursor {
            shown_movies: vec![101, 102],
            current_page: 1,
        };
        let watched: HashSet<MovieId> = [103].into_iter().collect();

        let batch = refresh(&catalog, &PreferenceSpec::default(), cursor, &watched).await;

        assert!(batch.restarted);
        // shown movies come back, watched ones do not
        assert_eq!(ids(&batch.movies), vec![101, 102, 104, 105, 106, 107, 108]);
        assert_eq!(batch.cursor.shown_movies, ids(&batch.movies));
        assert_eq!(batch.cursor.current_page, 1);
    }

    #[tokio::test]
    async fn test_refresh_restart_can_be_empty() {
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_discover()
            .returning(|_, _| PageFetch::SourceFailed("status 503".into()));

        let batch = refresh(
            &catalog,
            &PreferenceSpec::default(),
            FeedCursor::default(),
            &HashSet::new(),
        )
        .await;

        assert!(batch.restarted);
        assert!(batch.movies.is_empty());
        assert_eq!(batch.cursor, FeedCursor::default());
    }

    #[tokio::test]
    async fn test_refresh_does_not_repeat_within_batch() {
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_discover()
            .returning(|_, _| PageFetch::Movies(vec![movie(1), movie(1), movie(2)]));

        let batch = refresh(
            &catalog,
            &PreferenceSpec::default(),
            FeedCursor::default(),
            &HashSet::new(),
        )
        .await;

        assert_eq!(ids(&batch.movies), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_popular_unwatched_stops_at_listing_size() {
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_popular().returning(|page| {
            let base = page as i64 * 100;
            PageFetch::Movies((1..=10).map(|i| movie(base + i)).collect())
        });
        let watched: HashSet<MovieId> = [101, 102].into_iter().collect();

        let movies = popular_unwatched(&catalog, &watched).await;

        assert_eq!(movies.len(), POPULAR_LISTING_SIZE);
        assert_eq!(movies[0].id, 103);
        assert_eq!(movies.last().map(|m| m.id), Some(302));
    }

    #[tokio::test]
    async fn test_popular_unwatched_stops_on_empty_page() {
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_popular()
            .with(eq(1u32))
            .times(1)
            .returning(|_| PageFetch::Movies(vec![movie(1), movie(2)]));
        catalog
            .expect_popular()
            .with(eq(2u32))
            .times(1)
            .returning(|_| PageFetch::Exhausted);

        let movies = popular_unwatched(&catalog, &HashSet::new()).await;
        assert_eq!(ids(&movies), vec![1, 2]);
    }
}
