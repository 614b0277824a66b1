//! TMDB API response types and request parameters.

use chrono::NaiveDate;
use serde::Deserialize;

use super::images::{ImageSize, image_url};

/// Upstream format of `release_date`.
const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display format for release dates (e.g. "Mar 31, 1999").
const RELEASE_DATE_DISPLAY_FORMAT: &str = "%b %d, %Y";

// --- Movie lists ---

/// Listing category served by the `movie/{category}` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieCategory {
    /// `movie/popular`.
    Popular,
    /// `movie/top_rated`.
    TopRated,
    /// `movie/now_playing`.
    NowPlaying,
    /// `movie/upcoming`.
    Upcoming,
}

impl MovieCategory {
    /// Relative endpoint path for this category.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Popular => "movie/popular",
            Self::TopRated => "movie/top_rated",
            Self::NowPlaying => "movie/now_playing",
            Self::Upcoming => "movie/upcoming",
        }
    }
}

/// Paged response shared by the listing and `search/movie` endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoviePage {
    /// Current page number (1-based).
    #[serde(default = "first_page")]
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<MovieSummary>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

const fn first_page() -> u32 {
    1
}

/// A movie as it appears in listings and search results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: String,
    /// Overview text.
    #[serde(default)]
    pub overview: String,
    /// Poster image path fragment.
    pub poster_path: Option<String>,
    /// Backdrop image path fragment.
    pub backdrop_path: Option<String>,
    /// Release date (`YYYY-MM-DD`, empty when unknown).
    #[serde(default)]
    pub release_date: String,
    /// Vote average (0.0-10.0).
    pub vote_average: f64,
    /// Vote count.
    pub vote_count: u32,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Runtime in minutes. Listing endpoints never include it.
    pub runtime: Option<u32>,
}

impl MovieSummary {
    /// Poster URL at the poster width.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|p| image_url(p, ImageSize::Poster))
    }

    /// Backdrop URL at the backdrop width.
    #[must_use]
    pub fn backdrop_url(&self) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|p| image_url(p, ImageSize::Backdrop))
    }

    /// Release date as "Mon DD, YYYY", or the raw value if it does not parse.
    #[must_use]
    pub fn formatted_release_date(&self) -> String {
        format_release_date(&self.release_date)
    }

    /// Vote average with one decimal.
    #[must_use]
    pub fn rating_text(&self) -> String {
        format!("{:.1}", self.vote_average)
    }

    /// Runtime as "2h 16m" / "45m", or `None` when unknown.
    #[must_use]
    pub fn formatted_runtime(&self) -> Option<String> {
        self.runtime.map(format_runtime)
    }
}

// --- Movie details ---

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetail {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Overview text.
    #[serde(default)]
    pub overview: String,
    /// Poster image path fragment.
    pub poster_path: Option<String>,
    /// Backdrop image path fragment.
    pub backdrop_path: Option<String>,
    /// Release date (`YYYY-MM-DD`, empty when unknown).
    #[serde(default)]
    pub release_date: String,
    /// Vote average.
    pub vote_average: f64,
    /// Vote count.
    pub vote_count: u32,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Production companies.
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    /// Spoken languages.
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    /// Release status (e.g. "Released").
    pub status: String,
    /// Tagline.
    pub tagline: Option<String>,
    /// Budget in USD.
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD.
    #[serde(default)]
    pub revenue: u64,
}

impl MovieDetail {
    /// Poster URL at the poster width.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|p| image_url(p, ImageSize::Poster))
    }

    /// Backdrop URL at the backdrop width.
    #[must_use]
    pub fn backdrop_url(&self) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|p| image_url(p, ImageSize::Backdrop))
    }

    /// Runtime as "2h 16m" / "45m", or "N/A" when unknown.
    #[must_use]
    pub fn formatted_runtime(&self) -> String {
        self.runtime
            .map_or_else(|| String::from("N/A"), format_runtime)
    }

    /// Genre names joined with ", ".
    #[must_use]
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Release date as "Mon DD, YYYY", or the raw value if it does not parse.
    #[must_use]
    pub fn formatted_release_date(&self) -> String {
        format_release_date(&self.release_date)
    }
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Production company entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductionCompany {
    /// Company ID.
    pub id: u64,
    /// Company name.
    pub name: String,
    /// Logo image path fragment.
    pub logo_path: Option<String>,
    /// Origin country (ISO 3166-1, may be empty).
    #[serde(default)]
    pub origin_country: String,
}

/// Spoken language entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpokenLanguage {
    /// English name.
    pub english_name: String,
    /// ISO 639-1 code.
    pub iso_639_1: String,
    /// Native name.
    pub name: String,
}

// --- Videos ---

/// Response from `movie/{movie_id}/videos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoList {
    /// TMDB movie ID.
    pub id: u64,
    /// Videos attached to the movie.
    pub results: Vec<Video>,
}

/// A video (trailer, teaser, clip...) hosted on an external site.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Video {
    /// TMDB video ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Provider-side key (YouTube video ID).
    pub key: String,
    /// Hosting site (e.g. "YouTube", "Vimeo").
    pub site: String,
    /// Category (e.g. "Trailer", "Teaser", "Featurette").
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the video is official.
    pub official: bool,
    /// Publish timestamp.
    pub published_at: String,
    /// Resolution (e.g. 1080).
    pub size: u32,
}

impl Video {
    fn is_youtube(&self) -> bool {
        self.site.eq_ignore_ascii_case("youtube")
    }

    /// Whether the video is a trailer or a teaser.
    #[must_use]
    pub fn is_trailer_or_teaser(&self) -> bool {
        self.kind == "Trailer" || self.kind == "Teaser"
    }

    /// Playable URL; only YouTube-hosted videos have one.
    #[must_use]
    pub fn youtube_url(&self) -> Option<String> {
        self.is_youtube()
            .then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }

    /// Thumbnail URL; only YouTube-hosted videos have one.
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<String> {
        self.is_youtube()
            .then(|| format!("https://img.youtube.com/vi/{}/hqdefault.jpg", self.key))
    }
}

// --- Credits ---

/// Response from `movie/{movie_id}/credits`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credits {
    /// TMDB movie ID.
    pub id: u64,
    /// Cast members.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew members.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// A cast member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Actor name.
    pub name: String,
    /// Character name.
    #[serde(default)]
    pub character: String,
    /// Profile image path fragment.
    pub profile_path: Option<String>,
    /// Billing order (lower is more prominent).
    pub order: u32,
}

impl CastMember {
    /// Profile photo URL at the profile width.
    #[must_use]
    pub fn profile_url(&self) -> Option<String> {
        self.profile_path
            .as_deref()
            .map(|p| image_url(p, ImageSize::Profile))
    }
}

/// A crew member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrewMember {
    /// TMDB person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Job title (e.g. "Director").
    pub job: String,
    /// Department (e.g. "Directing").
    pub department: String,
    /// Profile image path fragment.
    pub profile_path: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

// --- Search Parameters ---

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieParams {
    /// Free-text query (required, sent percent-encoded).
    pub query: String,
    /// Result page (1-based, default: 1).
    pub page: u32,
}

impl SearchMovieParams {
    /// Creates params for the first page of `query`.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

// --- Formatting ---

/// Formats minutes as "2h 16m", or "45m" under an hour.
#[must_use]
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{hours}h {rest}m")
    } else {
        format!("{rest}m")
    }
}

fn format_release_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, RELEASE_DATE_FORMAT).map_or_else(
        |_| String::from(raw),
        |date| date.format(RELEASE_DATE_DISPLAY_FORMAT).to_string(),
    )
}
