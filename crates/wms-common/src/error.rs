//! Error types for capabilities resolution.

use thiserror::Error;

/// Result type alias using WmsError.
pub type WmsResult<T> = Result<T, WmsError>;

/// Primary error type for capabilities resolution.
///
/// A layer that is missing from the document, or that carries no bounding box
/// or time dimension, is not an error: those lookups return `None`.
#[derive(Debug, Error)]
pub enum WmsError {
    // === Request construction ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Datasource host '{host}' does not contain the endpoint segment '{anchor}'")]
    MalformedHost { host: String, anchor: String },

    // === Transport ===
    #[error("Capabilities request failed: {0}")]
    Transport(String),

    #[error("Capabilities request to {url} returned HTTP {status}")]
    HttpStatus { status: u16, url: String },

    #[error("Request timeout")]
    Timeout,

    // === Document ===
    #[error("Malformed capabilities XML at byte {position}: {message}")]
    XmlParse { position: usize, message: String },

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    // === Configuration ===
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl WmsError {
    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// Nothing in this workspace retries; the flag is for callers that bring
    /// their own policy.
    pub fn is_transient(&self) -> bool {
        match self {
            WmsError::Transport(_) | WmsError::Timeout => true,
            WmsError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for WmsError {
    fn from(err: serde_json::Error) -> Self {
        WmsError::Config(format!("JSON error: {}", err))
    }
}
