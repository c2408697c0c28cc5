/// TMDB catalog provider
///
/// API Flow:
/// 1. Popular: /movie/popular → ranked list, first page is the default feed
/// 2. Discover: /discover/movie → filtered by genres, release dates, runtime, rating
/// 3. Search: /search/movie → title search
/// 4. Details: /movie/{id} → full record for one title
///
/// List responses are cached in Redis by their canonical query. Failed
/// requests are logged and surface as empty pages.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Movie, MovieDetails, PreferenceSpec, TmdbListResponse},
    services::catalog::{
        CatalogProvider, PageFetch, DISCOVER_RESULTS_LIMIT, POPULAR_RESULTS_LIMIT,
        SEARCH_RESULTS_LIMIT,
    },
};
use reqwest::{Client as HttpClient, StatusCode};
use std::time::Duration;

const CATALOG_CACHE_TTL: u64 = 3600; // 1 hour

type QueryParams = Vec<(&'static str, String)>;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    cache: Option<Cache>,
}

/// Query parameters of a discover request, apart from credentials and language
pub fn discover_params(preferences: &PreferenceSpec, page: u32) -> QueryParams {
    let mut params = vec![
        ("page", page.to_string()),
        ("sort_by", preferences.sort_by.as_str().to_string()),
    ];

    if !preferences.genres.is_empty() {
        let genres: Vec<String> = preferences.genres.iter().map(|g| g.to_string()).collect();
        params.push(("with_genres", genres.join(",")));
    }
    if let Some(min_year) = preferences.min_year {
        params.push(("primary_release_date.gte", format!("{}-01-01", min_year)));
    }
    if let Some(max_year) = preferences.max_year {
        params.push(("primary_release_date.lte", format!("{}-12-31", max_year)));
    }
    if let Some(min_runtime) = preferences.min_runtime {
        params.push(("with_runtime.gte", min_runtime.to_string()));
    }
    if let Some(max_runtime) = preferences.max_runtime {
        params.push(("with_runtime.lte", max_runtime.to_string()));
    }
    if let Some(min_rating) = preferences.min_rating {
        params.push(("vote_average.gte", min_rating.to_string()));
    }

    params
}

impl TmdbProvider {
    /// Creates a provider; `timeout` bounds each request when set
    pub fn new(
        cache: Option<Cache>,
        api_key: String,
        api_url: String,
        language: String,
        timeout: Option<Duration>,
    ) -> AppResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            cache,
        })
    }

    /// Cache key for a list request; the API key is never part of it
    fn list_cache_key(&self, path: &str, params: &[(&'static str, String)]) -> CacheKey {
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        CacheKey::CatalogPage(format!(
            "{}?language={}&{}",
            path,
            self.language,
            query.join("&")
        ))
    }

    async fn request_list(
        &self,
        path: &str,
        params: &[(&'static str, String)],
        limit: usize,
    ) -> AppResult<Vec<Movie>> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for {}",
                status, path
            )));
        }

        let body: TmdbListResponse = response
            .json()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        Ok(body.results.into_iter().take(limit).collect())
    }

    async fn cached_list(
        &self,
        path: &str,
        params: &[(&'static str, String)],
        limit: usize,
    ) -> AppResult<Vec<Movie>> {
        let Some(cache) = &self.cache else {
            return self.request_list(path, params, limit).await;
        };

        let key = self.list_cache_key(path, params);
        cached!(
            cache,
            key,
            CATALOG_CACHE_TTL,
            self.request_list(path, params, limit)
        )
    }

    async fn fetch_page(&self, path: &str, params: QueryParams, limit: usize) -> PageFetch {
        match self.cached_list(path, &params, limit).await {
            Ok(movies) => {
                tracing::debug!(path = %path, results = movies.len(), provider = self.name(), "Catalog page fetched");
                PageFetch::from_results(movies)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path,
                    provider = self.name(),
                    "Catalog request failed, returning empty page"
                );
                PageFetch::SourceFailed(e.to_string())
            }
        }
    }

    async fn request_details(&self, movie_id: i64) -> AppResult<Option<MovieDetails>> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for movie {}",
                response.status(),
                movie_id
            )));
        }

        let details = response
            .json()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;
        Ok(Some(details))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn popular(&self, page: u32) -> PageFetch {
        self.fetch_page(
            "/movie/popular",
            vec![("page", page.to_string())],
            POPULAR_RESULTS_LIMIT,
        )
        .await
    }

    async fn discover(&self, preferences: &PreferenceSpec, page: u32) -> PageFetch {
        self.fetch_page(
            "/discover/movie",
            discover_params(preferences, page),
            DISCOVER_RESULTS_LIMIT,
        )
        .await
    }

    async fn search(&self, query: &str) -> PageFetch {
        let query = query.trim();
        if query.is_empty() {
            return PageFetch::Exhausted;
        }

        self.fetch_page(
            "/search/movie",
            vec![("query", query.to_string()), ("page", "1".to_string())],
            SEARCH_RESULTS_LIMIT,
        )
        .await
    }

    async fn movie_details(&self, movie_id: i64) -> Option<MovieDetails> {
        match self.request_details(movie_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(error = %e, movie_id = movie_id, provider = self.name(), "Movie details unavailable");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
