//! Resolves favorite IDs into display-ready movie summaries.

use std::sync::Arc;

use movieapp_api::tmdb::{ApiError, ApiResult, MovieApi, MovieDetail, MovieSummary};
use tokio::task::JoinSet;
use tracing::instrument;

use crate::favorites::FavoriteSet;

/// Language assumed for movies resolved from a detail record.
const DEFAULT_ORIGINAL_LANGUAGE: &str = "en";

/// Fetches the detail record of every favorite concurrently and merges
/// them into one list ordered by title.
#[derive(Debug)]
pub struct FavoritesAggregator<A> {
    api: Arc<A>,
}

impl<A> Clone for FavoritesAggregator<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A> FavoritesAggregator<A>
where
    A: MovieApi + Send + Sync + 'static,
{
    /// Creates an aggregator backed by `api`.
    #[must_use]
    pub const fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Resolves `favorites` into movie summaries sorted by title.
    ///
    /// An empty set resolves to an empty list without any request. The
    /// batch is all-or-nothing: the first failed fetch fails the whole
    /// call and outstanding fetches are aborted.
    ///
    /// # Errors
    ///
    /// Returns the first per-movie error encountered.
    #[instrument(skip_all, fields(count = favorites.len()))]
    pub async fn resolve(&self, favorites: &FavoriteSet) -> ApiResult<Vec<MovieSummary>> {
        if favorites.is_empty() {
            return Ok(Vec::new());
        }

        let mut tasks = JoinSet::new();
        for movie_id in favorites.iter() {
            let api = Arc::clone(&self.api);
            tasks.spawn(async move { api.movie_details(movie_id).await });
        }

        let mut movies = Vec::with_capacity(favorites.len());
        while let Some(joined) = tasks.join_next().await {
            let detail = joined
                .map_err(|e| ApiError::TransportFailure(format!("detail fetch task failed: {e}")))??;
            movies.push(summary_from_detail(detail));
        }

        sort_by_title(&mut movies);
        tracing::debug!(resolved = movies.len(), "favorites resolved");
        Ok(movies)
    }
}

/// Projects a detail record down to a summary.
///
/// Fields a detail record does not carry get fixed values: not adult,
/// zero popularity, English, no video flag, original title equal to title.
#[must_use]
pub fn summary_from_detail(detail: MovieDetail) -> MovieSummary {
    let genre_ids = detail.genres.iter().map(|g| g.id).collect();
    MovieSummary {
        id: detail.id,
        original_title: detail.title.clone(),
        title: detail.title,
        overview: detail.overview,
        poster_path: detail.poster_path,
        backdrop_path: detail.backdrop_path,
        release_date: detail.release_date,
        vote_average: detail.vote_average,
        vote_count: detail.vote_count,
        adult: false,
        original_language: String::from(DEFAULT_ORIGINAL_LANGUAGE),
        popularity: 0.0,
        video: false,
        genre_ids,
        runtime: detail.runtime,
    }
}

/// Sorts by title using plain code point order, ties broken by ID.
pub fn sort_by_title(movies: &mut [MovieSummary]) {
    movies.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
}
