use thiserror::Error;

/// Error type for Neon API operations.
///
/// - `RequestFailed` — network/transport errors (wraps `reqwest::Error`)
/// - `Api` — any non-2xx status code; displays as the raw response text
/// - `MissingApiKey` — the API key environment variable is unset
/// - `AttributeNotFound` / `KeyNotFound` — lookup misses on a [`Resource`]
///
/// [`Resource`]: crate::resource::Resource
#[derive(Debug, Error)]
pub enum NeonError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Environment variable {0} is not set")]
    MissingApiKey(&'static str),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),
}

impl NeonError {
    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            NeonError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NeonError>;
