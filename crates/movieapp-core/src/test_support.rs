//! In-memory `MovieApi` used by the unit tests of this crate.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use movieapp_api::tmdb::{
    ApiError, ApiResult, CastMember, Credits, CrewMember, Genre, MovieApi, MovieCategory,
    MovieDetail, MoviePage, MovieSummary, SearchMovieParams, Video, VideoList,
};

/// Canned movie API with call counters.
#[derive(Debug, Default)]
pub struct MockMovieApi {
    pub details: HashMap<u64, MovieDetail>,
    pub detail_errors: HashMap<u64, ApiError>,
    pub detail_delays: HashMap<u64, Duration>,
    pub listing: Vec<MovieSummary>,
    pub search_error: Option<ApiError>,
    pub search_delay: Duration,
    pub videos: Vec<Video>,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    pub detail_calls: AtomicU32,
    pub details_completed: AtomicU32,
    pub search_queries: Mutex<Vec<String>>,
}

impl MockMovieApi {
    pub fn with_details(details: impl IntoIterator<Item = MovieDetail>) -> Self {
        Self {
            details: details.into_iter().map(|d| (d.id, d)).collect(),
            ..Self::default()
        }
    }

    pub fn detail_calls(&self) -> u32 {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn details_completed(&self) -> u32 {
        self.details_completed.load(Ordering::SeqCst)
    }

    pub fn searched(&self) -> Vec<String> {
        self.search_queries.lock().unwrap().clone()
    }
}

impl MovieApi for MockMovieApi {
    async fn movie_list(&self, _category: MovieCategory, page: u32) -> ApiResult<MoviePage> {
        Ok(MoviePage {
            page,
            results: self.listing.clone(),
            total_pages: 1,
            total_results: u32::try_from(self.listing.len()).unwrap(),
        })
    }

    async fn search_movies(&self, params: &SearchMovieParams) -> ApiResult<MoviePage> {
        self.search_queries.lock().unwrap().push(params.query.clone());
        if !self.search_delay.is_zero() {
            tokio::time::sleep(self.search_delay).await;
        }
        if let Some(err) = &self.search_error {
            return Err(err.clone());
        }
        Ok(MoviePage {
            page: params.page,
            results: vec![summary(1, &params.query)],
            total_pages: 1,
            total_results: 1,
        })
    }

    async fn movie_details(&self, movie_id: u64) -> ApiResult<MovieDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if let Some(err) = self.detail_errors.get(&movie_id) {
            return Err(err.clone());
        }
        if let Some(delay) = self.detail_delays.get(&movie_id) {
            tokio::time::sleep(*delay).await;
        }
        self.details_completed.fetch_add(1, Ordering::SeqCst);
        self.details.get(&movie_id).cloned().ok_or(ApiError::UpstreamError {
            status: 404,
            message: Some(String::from("The resource you requested could not be found.")),
        })
    }

    async fn movie_videos(&self, movie_id: u64) -> ApiResult<VideoList> {
        Ok(VideoList {
            id: movie_id,
            results: self.videos.clone(),
        })
    }

    async fn movie_credits(&self, movie_id: u64) -> ApiResult<Credits> {
        Ok(Credits {
            id: movie_id,
            cast: self.cast.clone(),
            crew: self.crew.clone(),
        })
    }
}

pub fn detail(id: u64, title: &str) -> MovieDetail {
    MovieDetail {
        id,
        title: String::from(title),
        overview: format!("Overview of {title}"),
        poster_path: Some(format!("/{id}.jpg")),
        backdrop_path: None,
        release_date: String::from("1999-03-31"),
        vote_average: 7.5,
        vote_count: 1200,
        runtime: Some(120),
        genres: vec![
            Genre {
                id: 28,
                name: String::from("Action"),
            },
            Genre {
                id: 878,
                name: String::from("Science Fiction"),
            },
        ],
        production_companies: Vec::new(),
        spoken_languages: Vec::new(),
        status: String::from("Released"),
        tagline: None,
        budget: 0,
        revenue: 0,
    }
}

pub fn summary(id: u64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: String::from(title),
        original_title: String::from(title),
        overview: String::new(),
        poster_path: None,
        backdrop_path: None,
        release_date: String::new(),
        vote_average: 0.0,
        vote_count: 0,
        adult: false,
        original_language: String::from("en"),
        popularity: 0.0,
        video: false,
        genre_ids: Vec::new(),
        runtime: None,
    }
}

pub fn video(key: &str, kind: &str) -> Video {
    Video {
        id: format!("v-{key}"),
        name: format!("{kind} {key}"),
        key: String::from(key),
        site: String::from("YouTube"),
        kind: String::from(kind),
        official: true,
        published_at: String::from("2021-01-01T00:00:00.000Z"),
        size: 1080,
    }
}

pub fn cast(id: u64, name: &str, order: u32) -> CastMember {
    CastMember {
        id,
        name: String::from(name),
        character: format!("Role {order}"),
        profile_path: None,
        order,
    }
}
