//! Runtime backfill for listing rows.
//!
//! Listing endpoints do not report runtimes, so each row needs a detail
//! fetch. Results are cached per movie ID for a short time.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use movieapp_api::tmdb::{ApiResult, MovieApi, MovieSummary};
use tokio::time::Instant;
use tracing::instrument;

/// How long a fetched runtime stays valid.
pub const DEFAULT_RUNTIME_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy)]
struct CachedRuntime {
    runtime: Option<u32>,
    fetched_at: Instant,
}

/// Per-movie runtime cache in front of the detail endpoint.
#[derive(Debug)]
pub struct RuntimeCache<A> {
    api: Arc<A>,
    ttl: Duration,
    entries: Mutex<HashMap<u64, CachedRuntime>>,
}

impl<A> RuntimeCache<A>
where
    A: MovieApi + Sync,
{
    /// Creates an empty cache.
    #[must_use]
    pub fn new(api: Arc<A>, ttl: Duration) -> Self {
        Self {
            api,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Runtime in minutes of `movie_id`, from cache when still fresh.
    ///
    /// # Errors
    ///
    /// Returns the detail fetch error on a cache miss. Failures are not cached.
    pub async fn runtime(&self, movie_id: u64) -> ApiResult<Option<u32>> {
        if let Some(runtime) = self.cached(movie_id) {
            return Ok(runtime);
        }
        let detail = self.api.movie_details(movie_id).await?;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                movie_id,
                CachedRuntime {
                    runtime: detail.runtime,
                    fetched_at: Instant::now(),
                },
            );
        Ok(detail.runtime)
    }

    /// Fills in missing runtimes of `movies`, one lookup per distinct ID.
    ///
    /// A failed lookup leaves that row's runtime unknown.
    #[instrument(skip_all, fields(count = movies.len()))]
    pub async fn backfill(&self, movies: &mut [MovieSummary]) {
        let missing: BTreeSet<u64> = movies
            .iter()
            .filter(|m| m.runtime.is_none())
            .map(|m| m.id)
            .collect();
        if missing.is_empty() {
            return;
        }

        let lookups = missing
            .iter()
            .map(|&movie_id| async move { (movie_id, self.runtime(movie_id).await) });
        let runtimes: HashMap<u64, Option<u32>> = join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(movie_id, result)| match result {
                Ok(runtime) => Some((movie_id, runtime)),
                Err(e) => {
                    tracing::warn!(movie_id, error = %e, "runtime lookup failed");
                    None
                }
            })
            .collect();

        for movie in movies.iter_mut().filter(|m| m.runtime.is_none()) {
            if let Some(runtime) = runtimes.get(&movie.id) {
                movie.runtime = *runtime;
            }
        }
    }

    /// Drops expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
        before.saturating_sub(entries.len())
    }

    fn cached(&self, movie_id: u64) -> Option<Option<u32>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&movie_id)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.runtime)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use movieapp_api::tmdb::ApiError;

    use super::*;
    use crate::test_support::{MockMovieApi, detail, summary};

    #[tokio::test(start_paused = true)]
    async fn test_runtime_is_cached_until_ttl() {
        // Arrange
        let api = Arc::new(MockMovieApi::with_details([detail(603, "The Matrix")]));
        let cache = RuntimeCache::new(Arc::clone(&api), DEFAULT_RUNTIME_TTL);

        // Act
        let first = cache.runtime(603).await.unwrap();
        let second = cache.runtime(603).await.unwrap();
        let calls_before_expiry = api.detail_calls();
        tokio::time::advance(Duration::from_secs(301)).await;
        let third = cache.runtime(603).await.unwrap();

        // Assert
        assert_eq!(first, Some(120));
        assert_eq!(second, Some(120));
        assert_eq!(third, Some(120));
        assert_eq!(calls_before_expiry, 1);
        assert_eq!(api.detail_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_not_cached() {
        // Arrange
        let mut api = MockMovieApi::default();
        api.detail_errors.insert(7, ApiError::Unauthorized);
        let api = Arc::new(api);
        let cache = RuntimeCache::new(Arc::clone(&api), DEFAULT_RUNTIME_TTL);

        // Act
        let first = cache.runtime(7).await;
        let second = cache.runtime(7).await;

        // Assert
        assert_eq!(first, Err(ApiError::Unauthorized));
        assert_eq!(second, Err(ApiError::Unauthorized));
        assert_eq!(api.detail_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backfill_fetches_each_missing_id_once() {
        // Arrange
        let mut matrix = detail(603, "The Matrix");
        matrix.runtime = Some(136);
        let mut api = MockMovieApi::with_details([matrix, detail(550, "Fight Club")]);
        api.detail_errors.insert(13, ApiError::TransportFailure(String::from("reset")));
        let api = Arc::new(api);
        let cache = RuntimeCache::new(Arc::clone(&api), DEFAULT_RUNTIME_TTL);

        let mut known = summary(27205, "Inception");
        known.runtime = Some(148);
        let mut movies = vec![
            summary(603, "The Matrix"),
            known,
            summary(13, "Forrest Gump"),
            summary(603, "The Matrix"),
            summary(550, "Fight Club"),
        ];

        // Act
        cache.backfill(&mut movies).await;

        // Assert
        let runtimes: Vec<_> = movies.iter().map(|m| m.runtime).collect();
        assert_eq!(
            runtimes,
            vec![Some(136), Some(148), None, Some(136), Some(120)]
        );
        assert_eq!(api.detail_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        // Arrange
        let api = Arc::new(MockMovieApi::with_details([detail(1, "A"), detail(2, "B")]));
        let cache = RuntimeCache::new(api, Duration::from_secs(10));
        cache.runtime(1).await.unwrap();
        tokio::time::advance(Duration::from_secs(6)).await;
        cache.runtime(2).await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;

        // Act
        let removed = cache.purge_expired();

        // Assert
        assert_eq!(removed, 1);
    }
}
