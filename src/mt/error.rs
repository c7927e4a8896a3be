use thiserror::Error;

/// Failure of a single HTTP exchange with a provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete before the fetcher's deadline
    #[error("request timed out")]
    Timeout,
    /// The server answered with a non-success HTTP status
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    /// Connection, protocol or body decoding failure
    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if let Some(status) = err.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Result type for a single HTTP exchange
pub type TransportResult<T> = Result<T, TransportError>;
