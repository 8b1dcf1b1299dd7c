// Error handling module
// Defines the error types shared by the auth layer and the endpoint wrappers

use thiserror::Error;

/// Errors surfaced by the storefront client
#[derive(Error, Debug)]
pub enum ClientError {
    /// A renewal was attempted with no refresh token in the session store
    #[error("no refresh token in session store")]
    MissingRefreshToken,

    /// The remote renewal call was rejected
    #[error("token refresh rejected: {0}")]
    RefreshRejected(String),

    /// Non-success response from the catalog API
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Session store failure
    #[error("session store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Transport-level failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Failure of a shared renewal operation
///
/// Cloneable so that every caller joined on the single in-flight refresh
/// receives the same outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefreshError {
    #[error("no refresh token in session store")]
    MissingRefreshToken,

    #[error("token refresh rejected: {0}")]
    Rejected(String),
}

impl From<RefreshError> for ClientError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::MissingRefreshToken => ClientError::MissingRefreshToken,
            RefreshError::Rejected(message) => ClientError::RefreshRejected(message),
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
