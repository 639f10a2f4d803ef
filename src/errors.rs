//! Error types and handling for the CredHub SDK
//!
//! This module defines the error types that can be returned by SDK operations.
//! Errors never carry credential values, only names, types and statuses.
//!
//! # Error Categories
//!
//! - **Lookups**: [`Error::NotFound`] when the server answers 404
//! - **Value decoding**: [`Error::TypeMismatch`] and [`Error::ShapeMismatch`]
//! - **Status**: [`Error::UnexpectedStatus`] for any other non-success response
//! - **Transport**: [`Error::Network`] and [`Error::Timeout`]
//! - **Client side**: [`Error::Unsupported`], [`Error::Config`], [`Error::Auth`]
//!
//! # Example
//!
//! ```no_run
//! # use credhub_sdk::{Client, Error};
//! # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
//! match client.get_latest_by_name("/concourse/main/db-password").await {
//!     Ok(cred) => println!("Got version {}", cred.id),
//!     Err(Error::NotFound { .. }) => println!("No such credential"),
//!     Err(Error::UnexpectedStatus { status: 403, .. }) => println!("Access denied"),
//!     Err(Error::Timeout) => println!("Request timed out"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

use crate::models::CredentialType;
use thiserror::Error;

/// Result type alias for the SDK
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum Error {
    /// The requested credential, id, path or permission set does not exist
    #[error("not found: {resource}")]
    NotFound {
        /// What was looked up (name, id or path)
        resource: String,
    },

    /// Typed extraction was requested for a variant other than the credential's type
    #[error("type mismatch: credential is {actual:?}, requested {expected:?}")]
    TypeMismatch {
        /// Variant the caller asked for
        expected: CredentialType,
        /// Type tag carried by the credential
        actual: CredentialType,
    },

    /// The credential's value does not have the exact shape of its type
    #[error("shape mismatch for {credential_type:?} value: {message}")]
    ShapeMismatch {
        /// Type tag the value was decoded against
        credential_type: CredentialType,
        /// Decoder message
        message: String,
    },

    /// The server answered with a status other than the expected one
    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Error description from the server body, if any
        message: String,
    },

    /// Operation is not supported for the requested credential type
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Deserialization error
    #[error("deserialize: {0}")]
    Deserialize(String),

    /// Network error
    #[error("network: {0}")]
    Network(String),

    /// Request timeout
    #[error("timeout")]
    Timeout,

    /// Configuration error
    #[error("config: {0}")]
    Config(String),

    /// Token acquisition failed
    #[error("auth: {0}")]
    Auth(String),

    /// Other errors
    #[error("other: {0}")]
    Other(String),
}

/// Coarse error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Resource not found (404)
    NotFound,
    /// Authentication/authorization errors (401/403, token endpoint)
    Auth,
    /// Value could not be interpreted as the requested variant
    Decode,
    /// Server-side failure or unexpected status
    Status,
    /// Network failures and timeouts
    Transport,
    /// Client-side misuse (configuration, unsupported operations)
    Client,
    /// Other/unknown error
    Other,
}

impl Error {
    /// Get the error kind for categorization
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::UnexpectedStatus { status, .. } if matches!(status, 401 | 403) => {
                ErrorKind::Auth
            }
            Error::UnexpectedStatus { .. } => ErrorKind::Status,
            Error::Auth(_) => ErrorKind::Auth,
            Error::TypeMismatch { .. } | Error::ShapeMismatch { .. } | Error::Deserialize(_) => {
                ErrorKind::Decode
            }
            Error::Network(_) | Error::Timeout => ErrorKind::Transport,
            Error::Unsupported(_) | Error::Config(_) => ErrorKind::Client,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Whether this is a [`Error::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Get the HTTP status code if the error came from a server response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::NotFound { .. } => Some(404),
            Error::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn not_found(resource: impl Into<String>) -> Self {
        Error::NotFound {
            resource: resource.into(),
        }
    }

    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|resp| resp.message())
            .unwrap_or_else(|| format!("HTTP error {}", status));

        Error::UnexpectedStatus { status, message }
    }
}

/// Server error body. The API uses `error`, older releases `error_description`.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ErrorResponse {
    fn message(self) -> Option<String> {
        self.error_description.or(self.error)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() || err.is_request() {
            Error::Network(err.to_string())
        } else if err.is_decode() {
            Error::Deserialize(err.to_string())
        } else {
            Error::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Deserialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::not_found("/a").kind(), ErrorKind::NotFound);
        assert_eq!(Error::Timeout.kind(), ErrorKind::Transport);
        assert_eq!(
            Error::Unsupported("generate json".to_string()).kind(),
            ErrorKind::Client
        );

        let err = Error::UnexpectedStatus {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Auth);

        let err = Error::TypeMismatch {
            expected: CredentialType::Rsa,
            actual: CredentialType::User,
        };
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_error_status_code() {
        assert_eq!(Error::not_found("/a").status_code(), Some(404));

        let err = Error::UnexpectedStatus {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.status_code(), Some(500));

        assert_eq!(Error::Timeout.status_code(), None);
    }

    #[test]
    fn test_from_response_body() {
        let err = Error::from_response(
            400,
            r#"{"error":"The request could not be completed because the credential does not exist or you do not have sufficient authorization."}"#,
        );
        match err {
            Error::UnexpectedStatus { status, message } => {
                assert_eq!(status, 400);
                assert!(message.starts_with("The request could not be completed"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = Error::from_response(502, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "unexpected status 502: HTTP error 502");
    }
}
