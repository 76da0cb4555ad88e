//! Error types for the pricing engine

use crate::positions::Position;
use thiserror::Error;

/// Result type alias for pricing operations
pub type Result<T> = std::result::Result<T, PricingError>;

/// Errors that can occur while configuring or running a pricing pass.
///
/// Numeric edge cases (missing ranks, missing curves, empty pools) are not
/// errors; they fall back to floor-level prices instead.
#[derive(Error, Debug)]
pub enum PricingError {
    /// Configuration value out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration could not be assembled from its sources
    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// Reference curve violates its invariants
    #[error("Invalid {position} curve: {reason}")]
    InvalidCurve { position: Position, reason: String },

    /// The same player id appears twice in one candidate pool
    #[error("Duplicate player id in candidate pool: {0}")]
    DuplicatePlayer(String),

    /// Position code not recognised
    #[error("Unknown position: {0}")]
    UnknownPosition(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PricingError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invalid curve error
    pub fn invalid_curve(position: Position, reason: impl Into<String>) -> Self {
        Self::InvalidCurve { position, reason: reason.into() }
    }
}
