use thiserror::Error;

pub type AlertyResult<T> = Result<T, AlertyError>;

#[derive(Error, Debug)]
pub enum AlertyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status} for {endpoint}")]
    Backend { status: u16, endpoint: String },

    #[error("Not logged in")]
    NoSession,

    #[error("Session expired")]
    SessionExpired,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}
