//! Error types for deconfliction checks.

use thiserror::Error;

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, DeconflictError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeconflictError {
    /// A caller-supplied argument is outside its valid domain
    /// (unknown mode, non-positive buffer or time step, zero-duration segment).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A flight failed validation at construction.
    #[error("invalid flight {flight_id}: {reason}")]
    InvalidFlight { flight_id: String, reason: String },
}

impl DeconflictError {
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::InvalidArgument(details.into())
    }

    pub fn invalid_flight(flight_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFlight {
            flight_id: flight_id.into(),
            reason: reason.into(),
        }
    }
}

/// Reject buffers that are zero, negative or not finite.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DeconflictError::invalid_argument(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}
