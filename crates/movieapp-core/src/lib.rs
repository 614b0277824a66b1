//! Application services on top of the TMDB client: the favorites store,
//! favorites aggregation, debounced search, the detail overview fan-out
//! and the runtime backfill cache.

pub mod aggregator;
pub mod details;
pub mod favorites;
pub mod runtime;
pub mod search;

#[cfg(test)]
mod test_support;

pub use aggregator::{FavoritesAggregator, sort_by_title, summary_from_detail};
pub use details::{MovieOverview, fetch_movie_overview};
pub use favorites::{FAVORITES_KEY, FavoriteSet, FavoritesStore, Subscriber, SubscriptionId};
pub use runtime::{DEFAULT_RUNTIME_TTL, RuntimeCache};
pub use search::{DEFAULT_DEBOUNCE, SearchDebouncer, SearchPhase, SearchState};
