//! Client error types

/// Error type for Carlettos API calls
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("server returned error: status={status}, code={code}, message={message}")]
    ServerError {
        status: u16,
        code: i32,
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// HTTP status reported by the server, if the request reached it
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ServerError { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
