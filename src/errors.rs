/*!
 * Error types for the creatorflow application.
 *
 * This module contains custom error types for different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Operation the active provider does not support
    #[error("Operation not supported by provider: {0}")]
    Unsupported(String),
}

/// Errors raised by the sequential chunk translation driver.
///
/// Every variant carries the 1-based ordinal of the chunk the pipeline
/// was processing when the operation aborted, and the fixed chunk total.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A chunk request failed; no later chunk was submitted
    #[error("translation failed at chunk {chunk} of {total}: {source}")]
    ChunkFailed {
        /// 1-based ordinal of the failing chunk
        chunk: usize,
        /// Total number of chunks in the operation
        total: usize,
        /// Underlying provider failure
        #[source]
        source: ProviderError,
    },

    /// The provider answered, but with an empty or implausibly short result
    #[error(
        "translation failed at chunk {chunk} of {total}: implausible result ({length} chars, expected at least {min})"
    )]
    ImplausibleResult {
        /// 1-based ordinal of the failing chunk
        chunk: usize,
        /// Total number of chunks in the operation
        total: usize,
        /// Character count of the trimmed response
        length: usize,
        /// Configured plausibility floor
        min: usize,
    },

    /// The operation was cancelled before the named chunk was submitted
    #[error("translation cancelled before chunk {chunk} of {total}")]
    Cancelled {
        /// 1-based ordinal of the first chunk that was not submitted
        chunk: usize,
        /// Total number of chunks in the operation
        total: usize,
    },
}

impl PipelineError {
    /// 1-based ordinal of the chunk the pipeline stopped at
    pub fn chunk(&self) -> usize {
        match self {
            Self::ChunkFailed { chunk, .. }
            | Self::ImplausibleResult { chunk, .. }
            | Self::Cancelled { chunk, .. } => *chunk,
        }
    }

    /// Total number of chunks in the aborted operation
    pub fn total(&self) -> usize {
        match self {
            Self::ChunkFailed { total, .. }
            | Self::ImplausibleResult { total, .. }
            | Self::Cancelled { total, .. } => *total,
        }
    }

    /// Whether the operation stopped because it was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Errors that can occur in the user directory and session layer
#[derive(Error, Debug)]
pub enum AccountError {
    /// Lookup for a username that does not exist
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Credential verification failed for an existing user
    #[error("Incorrect password")]
    InvalidPassword,

    /// Attempt to create a user with a taken username
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Username is empty or contains whitespace
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Password below the minimum length
    #[error("Password too short: minimum {0} characters")]
    WeakPassword(usize),

    /// Attempt to delete the only remaining admin account
    #[error("Cannot delete the last admin account: {0}")]
    LastAdmin(String),

    /// Session token does not exist
    #[error("Session not found")]
    SessionNotFound,

    /// Session token exists but is past its expiry
    #[error("Session expired")]
    SessionExpired,

    /// Stored password hash could not be decoded
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    /// Underlying storage failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(error: anyhow::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the translation pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Error from the account directory
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
