//! Closed error taxonomy for TMDB requests.

use thiserror::Error;

/// Result alias used by every TMDB operation.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Classified failure of a TMDB request.
///
/// The client never retries; every variant is returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ApiError {
    /// The endpoint and parameters could not be composed into a URL.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP 401: the API key was rejected.
    #[error("TMDB API rejected the API key (HTTP 401)")]
    Unauthorized,

    /// Any non-200 status other than 401.
    #[error("TMDB API error (HTTP {status}){}", describe_message(.message.as_deref()))]
    UpstreamError {
        /// HTTP status code.
        status: u16,
        /// `status_message` from the TMDB error body, when present.
        message: Option<String>,
    },

    /// The response body did not match the expected schema.
    #[error("failed to decode TMDB response: {0}")]
    DecodingFailure(String),

    /// No complete response was obtained (connect error, timeout, reset).
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

fn describe_message(message: Option<&str>) -> String {
    message.map_or_else(String::new, |m| format!(": {m}"))
}

impl ApiError {
    /// Text suitable for showing to the user next to a retry action.
    ///
    /// Every kind maps to the same generic text except `Unauthorized`,
    /// which points at the API key configuration.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => {
                "Invalid API key. Please check the TMDB_API_KEY setting and try again."
            }
            Self::InvalidRequest(_)
            | Self::UpstreamError { .. }
            | Self::DecodingFailure(_)
            | Self::TransportFailure(_) => "Something went wrong while loading movies. Try again.",
        }
    }

    /// Returns the HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::UpstreamError { status, .. } => Some(*status),
            Self::InvalidRequest(_) | Self::DecodingFailure(_) | Self::TransportFailure(_) => None,
        }
    }
}
