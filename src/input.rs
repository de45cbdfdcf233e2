//! JSON case files.
//!
//! A case file is a single JSON object.  The reserved `keys` entry carries the
//! declared share count `n` and threshold `k`; every other entry maps a share
//! index (the x-coordinate, written as a decimal string) to the share value
//! encoded in an arbitrary radix:
//!
//! ```json
//! {
//!     "keys": { "n": 4, "k": 3 },
//!     "1": { "base": "10", "value": "4" },
//!     "2": { "base": "2", "value": "111" }
//! }
//! ```
//!
//! Shares come back sorted by x, since input order fixes the combination
//! order and with it the tie-break of the vote.

use crate::{Share, ShareError};
use num_bigint::BigInt;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a case file.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    /// The file could not be read.
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    #[error("invalid case JSON: {0}")]
    /// The document is not valid JSON or has the wrong shape.
    Json(#[from] serde_json::Error),
    #[error("missing `keys` entry with n and k")]
    /// The reserved `keys` entry is absent.
    MissingKeys,
    #[error("share index `{0}` is not an integer")]
    /// A share key is not an integer.
    InvalidIndex(String),
    #[error("share {index}: base `{base}` is not a radix in 2..=36")]
    /// A share declares an unusable radix.
    InvalidBase {
        /// Share index as written in the file.
        index: String,
        /// Declared base.
        base: String,
    },
    #[error("share {index}: `{value}` is not a base-{base} integer")]
    /// A share value does not parse in its radix.
    InvalidValue {
        /// Share index as written in the file.
        index: String,
        /// Encoded value.
        value: String,
        /// Radix used for decoding.
        base: u32,
    },
    #[error(transparent)]
    /// The decoded share or threshold was rejected.
    Share(#[from] ShareError),
}

#[derive(Debug, Deserialize)]
struct RawCase {
    keys: Option<RawKeys>,
    #[serde(flatten)]
    entries: BTreeMap<String, RawShare>,
}

#[derive(Debug, Deserialize)]
struct RawKeys {
    n: usize,
    k: i64,
}

#[derive(Debug, Deserialize)]
struct RawShare {
    base: RawBase,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBase {
    Number(u64),
    Text(String),
}

impl fmt::Display for RawBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawBase::Number(n) => write!(f, "{n}"),
            RawBase::Text(s) => f.write_str(s),
        }
    }
}

/// Decoded case: declared parameters plus shares ordered by x.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareCase {
    /// Share count declared in the file.
    pub declared_n: usize,
    /// Reconstruction threshold.
    pub k: usize,
    /// Decoded shares, ascending by x.
    pub shares: Vec<Share>,
}

/// Non-fatal observations about a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// Fewer shares than the threshold; no combination can be formed.
    FewerSharesThanThreshold {
        /// Shares present.
        actual: usize,
        /// Threshold.
        k: usize,
    },
    /// Share count differs from the declared `n`.
    ShareCountMismatch {
        /// Declared `n`.
        declared: usize,
        /// Shares present.
        actual: usize,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::FewerSharesThanThreshold { actual, k } => write!(
                f,
                "only {actual} shares provided for threshold k={k}, the secret cannot be reconstructed"
            ),
            Advisory::ShareCountMismatch { declared, actual } => write!(
                f,
                "found {actual} shares but n={declared} was declared, using all {actual}"
            ),
        }
    }
}

impl ShareCase {
    /// Returns the advisories raised by this case, in a fixed order.
    pub fn advisories(&self) -> Vec<Advisory> {
        let actual = self.shares.len();
        let mut out = Vec::new();
        if actual < self.k {
            out.push(Advisory::FewerSharesThanThreshold { actual, k: self.k });
        }
        if actual != self.declared_n {
            out.push(Advisory::ShareCountMismatch {
                declared: self.declared_n,
                actual,
            });
        }
        out
    }
}

/// Parses a case from its JSON text.
pub fn parse_case(json: &str) -> Result<ShareCase, InputError> {
    let raw: RawCase = serde_json::from_str(json)?;
    let keys = raw.keys.ok_or(InputError::MissingKeys)?;
    if keys.k < 2 {
        return Err(ShareError::ThresholdTooSmall { k: keys.k }.into());
    }
    // Any k >= 2 fits a usize on 64-bit targets; elsewhere it saturates and yields no combinations.
    let k = usize::try_from(keys.k).unwrap_or(usize::MAX);
    let mut shares = Vec::with_capacity(raw.entries.len());
    for (index, entry) in raw.entries {
        shares.push(decode_share(index, entry)?);
    }
    shares.sort_by(|a, b| a.x().cmp(b.x()));
    Ok(ShareCase {
        declared_n: keys.n,
        k,
        shares,
    })
}

/// Reads and parses a case file.
pub fn load_case(path: impl AsRef<Path>) -> Result<ShareCase, InputError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_case(&contents)
}

/// Parses an optionally signed integer whose every digit belongs to `radix`.
///
/// `BigInt::parse_bytes` tolerates `_` separators; case files must not.
fn parse_strict(text: &str, radix: u32) -> Option<BigInt> {
    let text = text.trim();
    let digits = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    BigInt::parse_bytes(text.as_bytes(), radix)
}

fn decode_share(index: String, entry: RawShare) -> Result<Share, InputError> {
    let x = parse_strict(&index, 10).ok_or_else(|| InputError::InvalidIndex(index.clone()))?;
    let base = match &entry.base {
        RawBase::Number(n) => u32::try_from(*n).ok(),
        RawBase::Text(s) => s.trim().parse::<u32>().ok(),
    }
    .filter(|b| (2..=36).contains(b))
    .ok_or_else(|| InputError::InvalidBase {
        index: index.clone(),
        base: entry.base.to_string(),
    })?;
    let y = parse_strict(&entry.value, base).ok_or_else(|| {
        InputError::InvalidValue {
            index: index.clone(),
            value: entry.value.clone(),
            base,
        }
    })?;
    Ok(Share::new(x, y)?)
}
