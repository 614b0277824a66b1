//! Everything the detail screen shows, fetched together.

use movieapp_api::tmdb::{ApiResult, CastMember, CrewMember, MovieApi, MovieDetail, Video};
use tracing::instrument;

/// Detail record plus trailers, cast and crew of one movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieOverview {
    /// Full detail record.
    pub detail: MovieDetail,
    /// Trailers and teasers only, in upstream order.
    pub videos: Vec<Video>,
    /// Ordered by billing order.
    pub cast: Vec<CastMember>,
    /// Everyone credited behind the camera.
    pub crew: Vec<CrewMember>,
}

impl MovieOverview {
    /// Crew members credited with `job` (e.g. `"Director"`).
    pub fn crew_with_job<'a>(&'a self, job: &'a str) -> impl Iterator<Item = &'a CrewMember> {
        self.crew.iter().filter(move |c| c.job == job)
    }
}

/// Fetches detail, videos and credits of `movie_id` concurrently.
///
/// # Errors
///
/// Returns the first of the three requests to fail.
#[instrument(skip_all, fields(movie_id = movie_id))]
pub async fn fetch_movie_overview<A>(api: &A, movie_id: u64) -> ApiResult<MovieOverview>
where
    A: MovieApi + Sync,
{
    let (detail, videos, credits) = tokio::try_join!(
        api.movie_details(movie_id),
        api.movie_videos(movie_id),
        api.movie_credits(movie_id),
    )?;

    let videos = videos
        .results
        .into_iter()
        .filter(Video::is_trailer_or_teaser)
        .collect();
    let mut cast = credits.cast;
    cast.sort_by_key(|c| c.order);

    Ok(MovieOverview {
        detail,
        videos,
        cast,
        crew: credits.crew,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use movieapp_api::tmdb::ApiError;

    use super::*;
    use crate::test_support::{MockMovieApi, cast, detail, video};

    #[tokio::test]
    async fn test_overview_filters_videos_and_orders_cast() {
        // Arrange
        let mut api = MockMovieApi::with_details([detail(603, "The Matrix")]);
        api.videos = vec![
            video("a", "Trailer"),
            video("b", "Featurette"),
            video("c", "Teaser"),
            video("d", "Clip"),
        ];
        api.cast = vec![
            cast(1, "Keanu Reeves", 0),
            cast(3, "Carrie-Anne Moss", 2),
            cast(2, "Laurence Fishburne", 1),
        ];
        api.crew = vec![CrewMember {
            id: 9,
            name: String::from("Lana Wachowski"),
            job: String::from("Director"),
            department: String::from("Directing"),
            profile_path: None,
        }];

        // Act
        let overview = fetch_movie_overview(&api, 603).await.unwrap();

        // Assert
        assert_eq!(overview.detail.title, "The Matrix");
        assert_eq!(
            overview.videos.iter().map(|v| v.key.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert_eq!(
            overview.cast.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(overview.crew_with_job("Director").count(), 1);
        assert_eq!(overview.crew_with_job("Writer").count(), 0);
    }

    #[tokio::test]
    async fn test_overview_fails_when_detail_fails() {
        // Arrange
        let mut api = MockMovieApi::default();
        api.detail_errors
            .insert(603, ApiError::DecodingFailure(String::from("missing field `title`")));

        // Act
        let result = fetch_movie_overview(&api, 603).await;

        // Assert
        assert!(matches!(result, Err(ApiError::DecodingFailure(_))));
    }
}
