#![deny(missing_docs)]

//! # shamir_vote
//!
//! **shamir_vote** recovers a secret shared with a Shamir-style polynomial
//! scheme when some of the shares may be corrupted.  Instead of trusting any
//! single set of `k` shares, it interpolates *every* `k`-combination at
//! `x = 0` over unbounded integers, keeps the secret that comes up most
//! often, and reports which shares agree with it.
//!
//! ## Features
//!
//! * **Shares**: the [`Share`] value type, an `(x, y)` point with `x ≠ 0`.
//! * **Combinations**: the [`combinations`] module enumerates all
//!   `k`-subsets in a deterministic lexicographic order.
//! * **Interpolation**: [`interpolate_at_zero`] evaluates the Lagrange form
//!   at the origin, either truncating each term (the historical behaviour) or
//!   reducing the whole sum exactly, see [`InterpolationMode`].
//! * **Consensus**: [`reconstruct`] votes over all combinations and splits
//!   the input into valid and invalid shares; large workloads fan out over
//!   rayon.
//! * **I/O**: the [`input`] and [`report`] modules read the JSON case format
//!   and render results, and the `shamir_vote` binary ties them together.
//!
//! ## Usage
//!
//! ```rust
//! use num_bigint::BigInt;
//! use shamir_vote::{reconstruct, Share};
//!
//! // y = 2x + 1, plus one corrupted share at x = 4.
//! let shares: Vec<Share> = [(1, 3), (2, 5), (3, 7), (4, 100)]
//!     .iter()
//!     .map(|&(x, y)| Share::from_i64(x, y).unwrap())
//!     .collect();
//!
//! let result = reconstruct(&shares, 2).unwrap();
//! assert_eq!(result.secret, BigInt::from(1));
//! assert_eq!(result.support, 3);
//! assert_eq!(result.invalid.len(), 1);
//! ```

pub mod combinations;
pub mod consensus;
mod error;
pub mod input;
pub mod interpolate;
pub mod report;
mod share;

pub use combinations::{binomial, generate, Combinations};
pub use consensus::{
    reconstruct, reconstruct_with, Parallelism, ReconstructOptions, Reconstruction, SecretTally,
    PARALLEL_THRESHOLD,
};
pub use error::ShareError;
pub use input::{load_case, parse_case, Advisory, InputError, ShareCase};
pub use interpolate::{interpolate_at_zero, interpolate_at_zero_with, InterpolationMode};
pub use report::{render_lines, write_report, ReportDocument};
pub use share::Share;
