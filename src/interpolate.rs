//! Lagrange interpolation at `x = 0` over unbounded integers.
//!
//! For a combination of `k` shares `(x_j, y_j)` the constant term of the
//! unique degree-`(k-1)` polynomial through them is
//!
//! ```text
//! f(0) = Σ_j  y_j · Π_{m≠j} (−x_m) / Π_{m≠j} (x_j − x_m)
//! ```
//!
//! No modular arithmetic is involved.  Each term is a rational number and
//! [`InterpolationMode`] decides how it is brought back to an integer: the
//! default truncates every term on its own, matching the historical
//! behaviour of the tool, while [`InterpolationMode::Exact`] sums the terms as
//! a single fraction and divides once.  Both truncate toward zero.

use crate::{Share, ShareError};
use num_bigint::BigInt;
use num_traits::{One, Zero};
use std::collections::HashSet;

/// Reduction strategy for the rational Lagrange terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Divide every term separately, truncating toward zero.
    #[default]
    Truncating,
    /// Accumulate all terms over a common denominator and divide once.
    Exact,
}

/// Interpolates the combination at `x = 0` using per-term truncating division.
///
/// Fails with [`ShareError::InsufficientShares`] for fewer than two shares and
/// with [`ShareError::DuplicateAbscissa`] if two shares have the same `x`.
///
/// ```
/// use num_bigint::BigInt;
/// use shamir_vote::{interpolate_at_zero, Share};
///
/// // y = 2x + 1
/// let combo = [Share::from_i64(1, 3).unwrap(), Share::from_i64(2, 5).unwrap()];
/// assert_eq!(interpolate_at_zero(&combo).unwrap(), BigInt::from(1));
/// ```
pub fn interpolate_at_zero(combo: &[Share]) -> Result<BigInt, ShareError> {
    interpolate_at_zero_with(combo, InterpolationMode::Truncating)
}

/// Interpolates the combination at `x = 0` with the chosen reduction mode.
pub fn interpolate_at_zero_with(
    combo: &[Share],
    mode: InterpolationMode,
) -> Result<BigInt, ShareError> {
    let terms = lagrange_terms(combo)?;
    let secret = match mode {
        InterpolationMode::Truncating => terms
            .into_iter()
            .fold(BigInt::zero(), |acc, (num, den)| acc + num / den),
        InterpolationMode::Exact => {
            let (num, den) = terms.into_iter().fold(
                (BigInt::zero(), BigInt::one()),
                |(acc_num, acc_den), (num, den)| (acc_num * &den + num * &acc_den, acc_den * den),
            );
            num / den
        }
    };
    Ok(secret)
}

/// Returns `(y_j · Π(−x_m), Π(x_j − x_m))` for every share of the combination.
fn lagrange_terms(combo: &[Share]) -> Result<Vec<(BigInt, BigInt)>, ShareError> {
    if combo.len() < 2 {
        return Err(ShareError::InsufficientShares { got: combo.len() });
    }
    let mut seen = HashSet::with_capacity(combo.len());
    for share in combo {
        if !seen.insert(share.x()) {
            return Err(ShareError::DuplicateAbscissa {
                x: share.x().clone(),
            });
        }
    }

    let mut terms = Vec::with_capacity(combo.len());
    for (j, share_j) in combo.iter().enumerate() {
        let xj = share_j.x();
        let mut numerator = share_j.y().clone();
        let mut denominator = BigInt::one();
        for (m, share_m) in combo.iter().enumerate() {
            if m == j {
                continue;
            }
            let xm = share_m.x();
            let diff = xj - xm;
            // Unreachable after the duplicate scan, kept so a zero never reaches the division.
            if diff.is_zero() {
                return Err(ShareError::DuplicateAbscissa { x: xj.clone() });
            }
            numerator *= -xm;
            denominator *= diff;
        }
        terms.push((numerator, denominator));
    }
    Ok(terms)
}
