/*!
 * Error types for the potranslate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the remote translation service
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
        message: String
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
}

/// Configuration errors, reported before any remote call is made
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Batch character limits must both be positive
    #[error("batch character limits must be positive, got min {min} / max {max}")]
    NonPositiveLimit {
        /// Configured soft minimum
        min: usize,
        /// Configured hard maximum
        max: usize
    },

    /// The soft minimum must stay below the hard maximum
    #[error("minimum batch size {min} must be below the maximum {max}")]
    LimitOrder {
        /// Configured soft minimum
        min: usize,
        /// Configured hard maximum
        max: usize
    },

    /// A language code the tool cannot work with
    #[error("unsupported language code: {0}")]
    UnsupportedLanguage(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the translation service
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while dispatching planned batches
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] crate::translation::DispatchError),

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
