//! Error types for API client operations.

use thiserror::Error;

use agentdev_persistence::PersistenceError;

/// Errors returned by [`ApiClient`](crate::ApiClient) calls.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered 401. The local session has been cleared.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// No session is stored; log in first.
    #[error("not logged in")]
    NotLoggedIn,

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Any other non-success status, with the server's `error` text.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("session store error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl ClientError {
    /// True when the caller has to log in (again).
    pub fn needs_login(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_) | ClientError::NotLoggedIn)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::RateLimited { .. } => Some(429),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_login() {
        assert!(ClientError::Unauthorized("expired".into()).needs_login());
        assert!(ClientError::NotLoggedIn.needs_login());
        assert!(!ClientError::Api {
            status: 404,
            message: "Project not found".into()
        }
        .needs_login());
    }

    #[test]
    fn test_status() {
        let err = ClientError::Api {
            status: 422,
            message: "name: must not be empty".into(),
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "API error 422: name: must not be empty");
        assert_eq!(ClientError::NotLoggedIn.status(), None);
    }
}
