//! Error taxonomy shared by the interpolation and consensus layers.

use num_bigint::BigInt;
use thiserror::Error;

/// Errors raised while building shares or reconstructing a secret.
///
/// `InsufficientShares` and `DuplicateAbscissa` are local to a single
/// combination and are recovered by the consensus engine, which skips the
/// offending combination.  `ThresholdTooSmall` and `EmptyResult` fail the
/// whole reconstruction call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("share x-coordinate cannot be zero, the secret lives at x = 0")]
    /// A share was constructed at x = 0.
    InvalidShare,
    #[error("at least two shares are required for interpolation (got {got})")]
    /// Fewer than two shares were handed to the interpolator.
    InsufficientShares {
        /// Number of shares supplied.
        got: usize,
    },
    #[error("duplicate x-coordinate {x} in combination")]
    /// Two shares of one combination share an x-coordinate.
    DuplicateAbscissa {
        /// The repeated x-coordinate.
        x: BigInt,
    },
    #[error("threshold k must be at least 2 (got {k})")]
    /// The reconstruction threshold is below 2.
    ThresholdTooSmall {
        /// Threshold supplied by the caller, which may be negative when read from a case file.
        k: i64,
    },
    #[error("no combination produced a secret")]
    /// Every combination failed, or there were none to evaluate.
    EmptyResult,
}
