//! Error types for GitLab API operations.

use thiserror::Error;

use crate::response::ResponseMeta;

/// Errors that can occur during GitLab API operations.
///
/// Errors detected locally ([`InvalidArgument`](GitLabError::InvalidArgument),
/// [`MissingField`](GitLabError::MissingField),
/// [`RequestBuild`](GitLabError::RequestBuild)) are raised before anything is
/// sent. Errors for requests the server answered carry that response's
/// [`ResponseMeta`].
#[derive(Debug, Error)]
pub enum GitLabError {
    /// Configuration is missing or incomplete.
    #[error("GitLab configuration required: {0}")]
    ConfigMissing(String),

    /// Unsupported project reference.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required option field was not set.
    #[error("{operation} requires '{field}'")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    /// The request could not be constructed (e.g. option encoding failed).
    #[error("Failed to build request: {0}")]
    RequestBuild(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("GitLab API error ({status_code}): {message}")]
    ApiError {
        message: String,
        status_code: u16,
        response: Box<ResponseMeta>,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        retry_after_secs: Option<u64>,
        response: Box<ResponseMeta>,
    },

    /// The server answered but its body could not be read.
    #[error("Failed to read response body (HTTP {}): {source}", .response.status)]
    BodyRead {
        #[source]
        source: reqwest::Error,
        response: Box<ResponseMeta>,
    },

    /// The response body could not be decoded.
    #[error("Failed to decode response (HTTP {}): {source}", .response.status)]
    Decode {
        #[source]
        source: serde_json::Error,
        response: Box<ResponseMeta>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON serialization error.
    #[error("Failed to serialize: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl GitLabError {
    /// Metadata of the response that produced this error, if the server answered.
    pub fn response(&self) -> Option<&ResponseMeta> {
        match self {
            Self::ApiError { response, .. }
            | Self::RateLimited { response, .. }
            | Self::BodyRead { response, .. }
            | Self::Decode { response, .. } => Some(&**response),
            _ => None,
        }
    }

    /// HTTP status code of the failed response, if any.
    pub fn status_code(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// Returns true for a 404 response.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Returns false when the error was raised before the request left the client.
    pub fn was_sent(&self) -> bool {
        !matches!(
            self,
            Self::ConfigMissing(_)
                | Self::InvalidArgument(_)
                | Self::MissingField { .. }
                | Self::RequestBuild(_)
                | Self::UrlError(_)
        )
    }
}

/// Result type alias for GitLab operations.
pub type Result<T> = core::result::Result<T, GitLabError>;
