//! `MovieApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::ApiResult;
use super::types::{Credits, MovieCategory, MovieDetail, MoviePage, SearchMovieParams, VideoList};

/// TMDB movie API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait;
/// implement `MovieApi` to get both variants.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MovieApi: Send)]
pub trait LocalMovieApi {
    /// Fetches one page of a listing category.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for page 0, otherwise any classified
    /// transport, HTTP or decoding failure.
    async fn movie_list(&self, category: MovieCategory, page: u32) -> ApiResult<MoviePage>;

    /// Searches movies by free-text query.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for a blank query or page 0, otherwise any
    /// classified transport, HTTP or decoding failure.
    async fn search_movies(&self, params: &SearchMovieParams) -> ApiResult<MoviePage>;

    /// Fetches the full detail record of a movie.
    ///
    /// # Errors
    ///
    /// Returns a classified transport, HTTP or decoding failure.
    async fn movie_details(&self, movie_id: u64) -> ApiResult<MovieDetail>;

    /// Fetches the videos attached to a movie.
    ///
    /// # Errors
    ///
    /// Returns a classified transport, HTTP or decoding failure.
    async fn movie_videos(&self, movie_id: u64) -> ApiResult<VideoList>;

    /// Fetches cast and crew of a movie.
    ///
    /// # Errors
    ///
    /// Returns a classified transport, HTTP or decoding failure.
    async fn movie_credits(&self, movie_id: u64) -> ApiResult<Credits>;
}
