//! TMDB API client module.
//!
//! Handles authenticated HTTP requests to the TMDB API v3 movie
//! endpoints and decodes listing, search, detail, video and credits data.

mod api;
mod client;
mod error;
mod images;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieApi, MovieApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use error::{ApiError, ApiResult};
pub use images::{IMAGE_BASE_URL, ImageSize, image_url};
pub use types::{
    CastMember, Credits, CrewMember, Genre, MovieCategory, MovieDetail, MoviePage, MovieSummary,
    ProductionCompany, SearchMovieParams, SpokenLanguage, Video, VideoList, format_runtime,
};
