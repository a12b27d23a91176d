//! Pipeline error types.
//!
//! Everything that can go wrong while fetching candidates has a named
//! variant. An empty batch is not an error; it is reported as no selection.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Pixabay API key not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status}")]
    ProviderStatus { status: u16 },

    #[error("Malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No candidate source enabled for request {request_id}")]
    NoSources { request_id: String },

    #[error("All {count} candidate sources failed, last error: {last}")]
    AllSourcesFailed { count: usize, last: Box<MediaError> },
}

impl MediaError {
    /// Whether the failure came from the provider side rather than from
    /// local configuration. Callers surface these as retrievable.
    pub fn is_provider_failure(&self) -> bool {
        match self {
            MediaError::Http(_) | MediaError::ProviderStatus { .. } | MediaError::Decode(_) => true,
            MediaError::AllSourcesFailed { last, .. } => last.is_provider_failure(),
            MediaError::MissingApiKey | MediaError::Io { .. } | MediaError::NoSources { .. } => false,
        }
    }
}

/// Result type alias for pipeline operations.
pub type MediaResult<T> = Result<T, MediaError>;
