//! Error types for the POC moving average engine.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the POC moving average engine.
///
/// Empty volume profiles and missing runway are not errors; the engine
/// handles those as ordinary state checks.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration outside its allowed domain.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed market data (e.g. negative volume).
    #[error("Data error: {0}")]
    Data(String),

    /// An event arrived before the controller was configured.
    #[error("Controller is not configured")]
    NotConfigured,

    /// `configure` was called twice on the same controller.
    #[error("Controller is already configured")]
    AlreadyConfigured,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Whether this error is fatal for a session (anything but bad data).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Data(_))
    }
}
