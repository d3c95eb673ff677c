//! Crate-wide error type for startup and configuration failures.

use thiserror::Error;

/// Errors raised while configuring or starting the widget server.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The backend base URL or chat path does not form a valid URL.
    #[error("Invalid backend URL: {0}")]
    InvalidBackendUrl(#[from] url::ParseError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fallible setup operations.
pub type Result<T> = std::result::Result<T, Error>;
