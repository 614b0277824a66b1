//! Image URL derivation for TMDB path fragments.

/// Base URL of the TMDB image host.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Fixed rendition widths used by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    /// Posters (`w500`).
    Poster,
    /// Backdrops (`w780`).
    Backdrop,
    /// Cast profile photos (`w185`).
    Profile,
}

impl ImageSize {
    /// TMDB size segment for this rendition.
    #[must_use]
    pub const fn width(self) -> &'static str {
        match self {
            Self::Poster => "w500",
            Self::Backdrop => "w780",
            Self::Profile => "w185",
        }
    }
}

/// Builds a loadable image URL from a path fragment such as `/abc.jpg`.
///
/// Pure: no validation and no network access.
#[must_use]
pub fn image_url(path: &str, size: ImageSize) -> String {
    format!("{IMAGE_BASE_URL}{}{path}", size.width())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url() {
        assert_eq!(
            image_url("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg", ImageSize::Poster),
            "https://image.tmdb.org/t/p/w500/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg"
        );
    }

    #[test]
    fn test_backdrop_and_profile_widths() {
        assert_eq!(
            image_url("/a.jpg", ImageSize::Backdrop),
            "https://image.tmdb.org/t/p/w780/a.jpg"
        );
        assert_eq!(
            image_url("/a.jpg", ImageSize::Profile),
            "https://image.tmdb.org/t/p/w185/a.jpg"
        );
    }

    #[test]
    fn test_image_url_is_deterministic() {
        // Arrange
        let path = "/ncEsesgOJDNrTUED89hYbA117wo.jpg";

        // Act
        let first = image_url(path, ImageSize::Backdrop);
        let second = image_url(path, ImageSize::Backdrop);

        // Assert
        assert_eq!(first, second);
    }
}
