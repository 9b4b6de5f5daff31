//! Common error types for VetFuse

use thiserror::Error;

/// Common result type for VetFuse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the fusion core
///
/// An assessment with no eligible signals is NOT an error: it is the
/// insufficient-signal sentinel on [`crate::types::PainAssessment`].
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed signal record rejected at the ingestion boundary
    #[error("Invalid signal: {0}")]
    InvalidSignal(String),

    /// Operation invoked on a session that has already been closed
    #[error("Session '{0}' is closed")]
    SessionClosed(String),

    /// Calibration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file read error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error (wraps toml::de::Error)
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
