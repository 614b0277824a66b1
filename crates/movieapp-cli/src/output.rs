//! Plain-text rendering of movie records for terminal output.

use movieapp_api::tmdb::{MovieDetail, MovieSummary};
use movieapp_core::MovieOverview;

/// Column header matching [`movie_row`].
pub const MOVIE_HEADER: &str = "ID\tTitle\tReleased\tRating\tRuntime";

/// Number of cast members shown by `details`.
const TOP_CAST: usize = 10;

/// One tab-separated listing row.
pub fn movie_row(movie: &MovieSummary) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        movie.id,
        movie.title,
        or_dash(&movie.formatted_release_date()),
        movie.rating_text(),
        movie.formatted_runtime().unwrap_or_else(|| String::from("-")),
    )
}

/// Lines describing one movie in full.
pub fn overview_lines(overview: &MovieOverview, is_favorite: bool) -> Vec<String> {
    let detail = &overview.detail;
    let mut lines = header_lines(detail, is_favorite);

    if !overview.videos.is_empty() {
        lines.push(String::from("Trailers:"));
        for video in &overview.videos {
            let link = video.youtube_url().unwrap_or_else(|| video.site.clone());
            lines.push(format!("  [{}] {}  {link}", video.kind, video.name));
        }
    }

    let directors: Vec<&str> = overview
        .crew_with_job("Director")
        .map(|c| c.name.as_str())
        .collect();
    if !directors.is_empty() {
        lines.push(format!("Directed by: {}", directors.join(", ")));
    }

    if !overview.cast.is_empty() {
        lines.push(String::from("Cast:"));
        for member in overview.cast.iter().take(TOP_CAST) {
            lines.push(format!("  {} as {}", member.name, or_dash(&member.character)));
        }
    }
    lines
}

fn header_lines(detail: &MovieDetail, is_favorite: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}){}",
        detail.title,
        detail.id,
        if is_favorite { " [favorite]" } else { "" }
    )];
    if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(format!("\"{tagline}\""));
    }
    lines.push(format!(
        "Released: {}  Runtime: {}  Rating: {:.1} ({} votes)  Status: {}",
        or_dash(&detail.formatted_release_date()),
        detail.formatted_runtime(),
        detail.vote_average,
        detail.vote_count,
        or_dash(&detail.status),
    ));
    let genres = detail.genre_names();
    if !genres.is_empty() {
        lines.push(format!("Genres: {genres}"));
    }
    if !detail.overview.is_empty() {
        lines.push(detail.overview.clone());
    }
    if let Some(url) = detail.poster_url() {
        lines.push(format!("Poster: {url}"));
    }
    lines
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use movieapp_api::tmdb::{CastMember, Credits, MovieDetail, VideoList};

    use super::*;

    fn matrix_detail() -> MovieDetail {
        serde_json::from_str(include_str!("../../../fixtures/tmdb/movie_details_603.json")).unwrap()
    }

    #[test]
    fn test_movie_row() {
        // Arrange
        let page: movieapp_api::tmdb::MoviePage =
            serde_json::from_str(include_str!("../../../fixtures/tmdb/movie_popular.json"))
                .unwrap();

        // Act
        let rows: Vec<String> = page.results.iter().map(movie_row).collect();

        // Assert
        assert_eq!(rows[0], "603\tThe Matrix\tMar 31, 1999\t8.2\t-");
        assert!(rows[2].starts_with("1184918\tSuzume\t-\t"));
    }

    #[test]
    fn test_movie_row_with_runtime() {
        // Arrange
        let mut movie = movieapp_core::summary_from_detail(matrix_detail());
        movie.vote_average = 7.96;

        // Act
        let row = movie_row(&movie);

        // Assert
        assert!(row.ends_with("\t8.0\t2h 16m"));
    }

    #[test]
    fn test_overview_lines() {
        // Arrange
        let videos: VideoList =
            serde_json::from_str(include_str!("../../../fixtures/tmdb/movie_videos_603.json"))
                .unwrap();
        let credits: Credits =
            serde_json::from_str(include_str!("../../../fixtures/tmdb/movie_credits_603.json"))
                .unwrap();
        let mut cast: Vec<CastMember> = credits.cast;
        cast.sort_by_key(|c| c.order);
        let overview = MovieOverview {
            detail: matrix_detail(),
            videos: videos
                .results
                .into_iter()
                .filter(movieapp_api::tmdb::Video::is_trailer_or_teaser)
                .collect(),
            cast,
            crew: credits.crew,
        };

        // Act
        let lines = overview_lines(&overview, true);

        // Assert
        assert_eq!(lines[0], "The Matrix (603) [favorite]");
        assert!(lines.contains(&String::from("\"Welcome to the Real World.\"")));
        assert!(lines.contains(&String::from("Genres: Action, Science Fiction")));
        assert!(
            lines
                .iter()
                .any(|l| l.contains("https://www.youtube.com/watch?v=vKQi3bBA1y8"))
        );
        assert!(lines.contains(&String::from("Directed by: Lilly Wachowski")));
        let cast_start = lines.iter().position(|l| l == "Cast:").unwrap();
        assert!(lines[cast_start + 1].starts_with("  Keanu Reeves as Neo"));
        assert!(lines[cast_start + 2].starts_with("  Laurence Fishburne"));
    }
}
