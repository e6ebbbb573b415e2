//! Error type for bandit construction and updates.

use thiserror::Error;

/// Errors raised by arm construction, posterior updates and engine calls.
///
/// All of these are deterministic given the inputs; nothing here is retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BanditError {
    /// Success probability outside `[0, 1]` (or NaN).
    #[error("arm {id}: success probability {p} is outside [0, 1]")]
    InvalidProbability { id: usize, p: f64 },

    /// Exploration parameter must be finite and strictly greater than -1.
    #[error("eta = {0} is invalid (must be finite and > -1)")]
    InvalidEta(f64),

    /// Beta prior shape parameters must be finite and positive.
    #[error("prior Beta({alpha}, {beta}) is invalid (both shapes must be finite and > 0)")]
    InvalidPrior { alpha: f64, beta: f64 },

    /// No arms were supplied.
    #[error("bandit has no arms")]
    NoArms,

    /// Arm index does not exist.
    #[error("arm index {index} out of range for {len} arms")]
    ArmOutOfRange { index: usize, len: usize },

    /// Observed reward was not 0 or 1.
    #[error("reward {0} is not binary (expected 0 or 1)")]
    InvalidReward(u8),

    /// A count that must be positive was zero.
    #[error("{what} must be at least 1")]
    InvalidCount { what: &'static str },

    /// Any other configuration value outside its domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BanditError>;
