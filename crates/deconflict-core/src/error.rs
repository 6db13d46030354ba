//! Error types for trajectory construction, registry access and validation.

use thiserror::Error;

/// Result type for deconfliction operations
pub type DeconflictionResult<T> = Result<T, DeconflictionError>;

/// Errors surfaced by the core. All of them are input-validation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeconflictionError {
    /// Malformed waypoint input detected at construction time
    #[error("invalid trajectory: {0}")]
    InvalidTrajectory(String),

    /// Position queried outside the trajectory's time domain
    #[error("time {t} is outside trajectory domain [0, {duration}]")]
    OutOfRange { t: f64, duration: f64 },

    /// A flight with this id is already scheduled
    #[error("flight '{0}' is already registered")]
    DuplicateFlightId(String),

    /// No flight with this id is scheduled
    #[error("flight '{0}' is not registered")]
    UnknownFlightId(String),

    /// Non-positive buffer or resolution
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
