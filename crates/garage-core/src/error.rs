//! Error types for garage-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration
    #[error("invalid configuration: {field}: {message}")]
    InvalidConfig {
        /// Config field name
        field: String,
        /// Detailed message
        message: String,
    },

    /// Password hashing failed
    #[error("credential error: {0}")]
    Credential(String),

    /// Token error
    #[error("token error: {0}")]
    Token(#[from] crate::auth::TokenError),

    /// Store error
    #[error("store error: {0}")]
    Store(#[from] crate::store::StoreError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
