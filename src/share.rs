//! Share value type.
//!
//! A [`Share`] is one point `(x, y)` sampled from the secret-encoding
//! polynomial.  The secret itself is the polynomial's value at `x = 0`, so a
//! share at the origin is rejected on construction.  Both coordinates are
//! unbounded integers and equality/hashing are structural, which lets shares
//! be used directly as set members when classifying them.

use crate::ShareError;
use num_bigint::BigInt;
use num_traits::Zero;
use std::fmt;

/// Immutable `(x, y)` point with `x ≠ 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Share {
    x: BigInt,
    y: BigInt,
}

impl Share {
    /// Creates a share, failing with [`ShareError::InvalidShare`] when `x` is zero.
    ///
    /// ```
    /// use num_bigint::BigInt;
    /// use shamir_vote::{Share, ShareError};
    ///
    /// let share = Share::new(BigInt::from(2), BigInt::from(-7)).unwrap();
    /// assert_eq!(share.to_string(), "(2, -7)");
    /// assert_eq!(
    ///     Share::new(BigInt::from(0), BigInt::from(1)).unwrap_err(),
    ///     ShareError::InvalidShare
    /// );
    /// ```
    pub fn new(x: BigInt, y: BigInt) -> Result<Self, ShareError> {
        if x.is_zero() {
            return Err(ShareError::InvalidShare);
        }
        Ok(Self { x, y })
    }

    /// Shorthand for small coordinates.
    pub fn from_i64(x: i64, y: i64) -> Result<Self, ShareError> {
        Self::new(BigInt::from(x), BigInt::from(y))
    }

    /// Returns the x-coordinate (the share index).
    #[inline]
    pub fn x(&self) -> &BigInt {
        &self.x
    }

    /// Returns the y-coordinate (the share value).
    #[inline]
    pub fn y(&self) -> &BigInt {
        &self.y
    }

    /// Consumes the share and returns its coordinates.
    pub fn into_parts(self) -> (BigInt, BigInt) {
        (self.x, self.y)
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
