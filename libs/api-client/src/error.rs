use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or rejected credentials, or a role that may not perform the call.
    #[error("Not authorized: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ClientError {
    /// Map a non-success response onto the error taxonomy.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 | 422 => ClientError::Validation(message),
            401 | 403 => ClientError::Auth(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            code => ClientError::Server { status: code, message },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}
