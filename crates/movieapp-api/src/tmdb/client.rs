//! `TmdbClient` - TMDB API client implementation.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::instrument;
use url::Url;

use super::api::MovieApi;
use super::error::{ApiError, ApiResult};
use super::types::{
    Credits, MovieCategory, MovieDetail, MoviePage, SearchMovieParams, TmdbErrorResponse,
    VideoList,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameter carrying the credential.
const API_KEY_PARAM: &str = "api_key";

/// TMDB API client.
///
/// Stateless per call: holds only the base URL, the credential and the
/// pooled HTTP client. No retries are performed.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key appended to every request.
    api_key: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the whole-request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when:
    /// - `api_key` is not set or blank.
    /// - `user_agent` is not set.
    /// - the base URL cannot serve as a base for relative paths.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> ApiResult<TmdbClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ApiError::InvalidRequest(String::from("api_key is required")))?;
        let user_agent = self
            .user_agent
            .ok_or_else(|| ApiError::InvalidRequest(String::from("user_agent is required")))?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| ApiError::InvalidRequest(format!("invalid default base URL: {e}")))?,
        };
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "base URL cannot be a base: {base_url}"
            )));
        }

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .gzip(true)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Fetches a page of popular movies.
    ///
    /// # Errors
    ///
    /// See [`MovieApi::movie_list`].
    pub async fn popular_movies(&self, page: u32) -> ApiResult<MoviePage> {
        self.movie_list(MovieCategory::Popular, page).await
    }

    /// Fetches a page of top-rated movies.
    ///
    /// # Errors
    ///
    /// See [`MovieApi::movie_list`].
    pub async fn top_rated_movies(&self, page: u32) -> ApiResult<MoviePage> {
        self.movie_list(MovieCategory::TopRated, page).await
    }

    /// Fetches a page of movies now playing in theaters.
    ///
    /// # Errors
    ///
    /// See [`MovieApi::movie_list`].
    pub async fn now_playing_movies(&self, page: u32) -> ApiResult<MoviePage> {
        self.movie_list(MovieCategory::NowPlaying, page).await
    }

    /// Fetches a page of upcoming movies.
    ///
    /// # Errors
    ///
    /// See [`MovieApi::movie_list`].
    pub async fn upcoming_movies(&self, page: u32) -> ApiResult<MoviePage> {
        self.movie_list(MovieCategory::Upcoming, page).await
    }

    /// Sends a GET request with the API key and query params, then
    /// classifies the outcome.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        if path.is_empty() || path.starts_with('/') {
            return Err(ApiError::InvalidRequest(format!(
                "endpoint path must be relative: {path:?}"
            )));
        }

        let url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidRequest(format!("failed to join URL path {path}: {e}")))?;

        let request = self
            .http_client
            .get(url)
            .query(&[(API_KEY_PARAM, self.api_key.as_str())])
            .query(query)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build request {path}: {e}")))?;

        // The full URL carries the API key; log the path only.
        tracing::debug!(params = query.len(), "TMDB API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| classify_send_error(path, &e))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("TMDB API rejected the API key");
            return Err(ApiError::Unauthorized);
        }

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TmdbErrorResponse>(&body)
                .ok()
                .map(|e| {
                    tracing::debug!(code = e.status_code, "TMDB error body");
                    e.status_message
                });
            tracing::warn!(status = status.as_u16(), "TMDB API error");
            return Err(ApiError::UpstreamError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::TransportFailure(format!("failed to read body of {path}: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::DecodingFailure(format!("{path}: {e}")))
    }
}

/// Maps a `reqwest` send failure onto the taxonomy.
fn classify_send_error(path: &str, err: &reqwest::Error) -> ApiError {
    if err.is_builder() {
        return ApiError::InvalidRequest(format!("failed to build request {path}: {err}"));
    }
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    ApiError::TransportFailure(format!("{kind}: {path}: {err}"))
}

fn validate_page(page: u32) -> ApiResult<()> {
    if page == 0 {
        return Err(ApiError::InvalidRequest(String::from(
            "page numbers start at 1",
        )));
    }
    Ok(())
}

impl MovieApi for TmdbClient {
    #[instrument(skip_all, fields(category = ?category, page = page))]
    async fn movie_list(&self, category: MovieCategory, page: u32) -> ApiResult<MoviePage> {
        validate_page(page)?;
        let query = [("page", page.to_string())];
        self.get_json(category.path(), &query).await
    }

    #[instrument(skip_all, fields(page = params.page))]
    async fn search_movies(&self, params: &SearchMovieParams) -> ApiResult<MoviePage> {
        validate_page(params.page)?;
        if params.query.trim().is_empty() {
            return Err(ApiError::InvalidRequest(String::from(
                "search query must not be blank",
            )));
        }
        let query = [
            ("query", params.query.clone()),
            ("page", params.page.to_string()),
        ];
        self.get_json("search/movie", &query).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_details(&self, movie_id: u64) -> ApiResult<MovieDetail> {
        let path = format!("movie/{movie_id}");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_videos(&self, movie_id: u64) -> ApiResult<VideoList> {
        let path = format!("movie/{movie_id}/videos");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_credits(&self, movie_id: u64) -> ApiResult<Credits> {
        let path = format!("movie/{movie_id}/credits");
        self.get_json(&path, &[]).await
    }
}
