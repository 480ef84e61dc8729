//! Page fetch error types

use std::time::Duration;

/// Errors a [`DataSource`](crate::source::DataSource) can report for a page fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Non-success HTTP response from the source.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Network error while talking to the source.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL configured for the source.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the source's response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// A fetched record has no usable identity field.
    #[error("Record is missing identity field '{field}'")]
    MissingIdentity {
        /// The configured identity field.
        field: String,
    },
}

impl FetchError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Maps a transport error, turning reqwest timeouts into [`FetchError::Timeout`].
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err)
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if retrying the same request could succeed.
    ///
    /// The pipeline never retries on its own; this is for the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

/// A fetch failure as seen by the render surface.
///
/// [`FetchError`] owns transport errors that cannot be cloned, so the pipeline
/// keeps this summary around for rendering instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// The page index the failed request was issued for.
    pub index: usize,
    /// HTTP status, when the source answered at all.
    pub status: Option<u16>,
    /// Human readable message.
    pub message: String,
    /// Whether retrying might help.
    pub retryable: bool,
}

impl FetchFailure {
    /// Summarises `error` for a request issued for page `index`.
    pub fn new(index: usize, error: &FetchError) -> Self {
        Self {
            index,
            status: error.status_code(),
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to load page {}: {}", self.index, self.message)
    }
}
