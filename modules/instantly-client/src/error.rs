use thiserror::Error;

pub type Result<T> = std::result::Result<T, InstantlyError>;

#[derive(Debug, Error)]
pub enum InstantlyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for InstantlyError {
    fn from(err: reqwest::Error) -> Self {
        InstantlyError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for InstantlyError {
    fn from(err: serde_json::Error) -> Self {
        InstantlyError::Parse(err.to_string())
    }
}
