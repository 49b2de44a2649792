use thiserror::Error;

/// Failure of a single REST call. Cloneable so a settled promise can be
/// rendered every frame without consuming it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Failed to reach the gateway: {0}")]
    Transport(String),

    #[error("The request timed out")]
    Timeout,

    #[error("Not found")]
    NotFound,

    #[error("The API request returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to deserialize the API response: {0}")]
    Decode(String),

    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// Pages show the generic "not found" state for these, "failed to load" otherwise.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_builder() {
            ApiError::ClientBuild(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
