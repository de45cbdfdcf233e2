//! Majority-vote secret reconstruction.
//!
//! Every `k`-combination of the candidate shares is interpolated at `x = 0`.
//! Honest combinations agree on one value while combinations touching a
//! corrupted share scatter, so the most frequent secret wins.  Shares that
//! took part in at least one combination producing the winner are reported
//! as valid, every other share as invalid.
//!
//! Ties between equally frequent secrets go to the one encountered first in
//! enumeration order, which is fixed by the input order of the shares.
//!
//! ```
//! use num_bigint::BigInt;
//! use shamir_vote::{reconstruct, Share};
//!
//! let shares: Vec<Share> = [(1, 3), (2, 5), (3, 7), (4, 100)]
//!     .iter()
//!     .map(|&(x, y)| Share::from_i64(x, y).unwrap())
//!     .collect();
//! let result = reconstruct(&shares, 2).unwrap();
//! assert_eq!(result.secret, BigInt::from(1));
//! assert_eq!(result.invalid, vec![Share::from_i64(4, 100).unwrap()]);
//! ```

use crate::combinations::{binomial, Combinations};
use crate::interpolate::{interpolate_at_zero_with, InterpolationMode};
use crate::{Share, ShareError};
use num_bigint::BigInt;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Number of combinations from which [`Parallelism::Auto`] switches to rayon.
pub const PARALLEL_THRESHOLD: usize = 1 << 10;

/// Controls whether combinations are evaluated on the rayon pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Parallel once the workload reaches [`PARALLEL_THRESHOLD`] and more than one thread exists.
    #[default]
    Auto,
    /// Always evaluate on the calling thread.
    Sequential,
    /// Always evaluate on the rayon pool.
    Parallel,
}

/// Tunables for [`reconstruct_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconstructOptions {
    /// How Lagrange terms are reduced to integers.
    pub mode: InterpolationMode,
    /// Evaluation strategy for the combinations.
    pub parallelism: Parallelism,
}

/// One row of the frequency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretTally {
    /// Interpolated secret.
    pub secret: BigInt,
    /// Number of combinations that produced it.
    pub count: usize,
    /// Producing combinations, as indices into the input shares.
    pub combinations: Vec<Vec<usize>>,
}

/// Outcome of a majority-vote reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    /// Most frequent secret.
    pub secret: BigInt,
    /// Number of combinations that produced [`secret`](Self::secret).
    pub support: usize,
    /// Shares that appear in a combination producing the secret, in input order.
    pub valid: Vec<Share>,
    /// All remaining shares, in input order.
    pub invalid: Vec<Share>,
    /// Frequency table in first-seen order.
    pub tally: Vec<SecretTally>,
    /// Combinations that produced a secret.
    pub evaluated: usize,
    /// Combinations skipped because interpolation failed.
    pub skipped: usize,
}

impl Reconstruction {
    /// Returns `true` if the share was classified as valid.
    pub fn is_valid(&self, share: &Share) -> bool {
        self.valid.contains(share)
    }
}

/// Secret → tally map that remembers first-seen order for tie-breaking.
#[derive(Debug, Default)]
struct FrequencyTable {
    entries: Vec<SecretTally>,
    positions: HashMap<BigInt, usize>,
}

impl FrequencyTable {
    fn record(&mut self, secret: BigInt, combination: Vec<usize>) {
        match self.positions.get(&secret) {
            Some(&pos) => {
                let entry = &mut self.entries[pos];
                entry.count += 1;
                entry.combinations.push(combination);
            }
            None => {
                self.positions.insert(secret.clone(), self.entries.len());
                self.entries.push(SecretTally {
                    secret,
                    count: 1,
                    combinations: vec![combination],
                });
            }
        }
    }

    /// Position of the strictly most frequent entry, first-seen on ties.
    fn winner(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (pos, entry) in self.entries.iter().enumerate() {
            match best {
                Some((_, count)) if entry.count <= count => {}
                _ => best = Some((pos, entry.count)),
            }
        }
        best.map(|(pos, _)| pos)
    }
}

/// Reconstructs the secret with default options.
///
/// Fails with [`ShareError::ThresholdTooSmall`] when `k < 2` and with
/// [`ShareError::EmptyResult`] when no combination could be interpolated.
pub fn reconstruct(shares: &[Share], k: usize) -> Result<Reconstruction, ShareError> {
    reconstruct_with(shares, k, &ReconstructOptions::default())
}

/// Reconstructs the secret by majority vote over all `k`-combinations.
pub fn reconstruct_with(
    shares: &[Share],
    k: usize,
    options: &ReconstructOptions,
) -> Result<Reconstruction, ShareError> {
    if k < 2 {
        return Err(ShareError::ThresholdTooSmall { k: k as i64 });
    }

    let combos: Vec<Vec<usize>> = Combinations::new(shares.len(), k).collect();
    debug!(
        n = shares.len(),
        k,
        combinations = combos.len(),
        expected = ?binomial(shares.len(), k),
        "enumerated combinations"
    );

    let outcomes = evaluate(shares, &combos, options);

    let mut table = FrequencyTable::default();
    let mut skipped = 0usize;
    for (combo, outcome) in combos.into_iter().zip(outcomes) {
        match outcome {
            Ok(secret) => {
                debug!(combination = %render(shares, &combo), %secret, "interpolated");
                table.record(secret, combo);
            }
            Err(err) => {
                skipped += 1;
                warn!(combination = %render(shares, &combo), error = %err, "skipping combination");
            }
        }
    }

    let winner = table.winner().ok_or(ShareError::EmptyResult)?;
    let evaluated: usize = table.entries.iter().map(|e| e.count).sum();
    let best = &table.entries[winner];

    let contributing: HashSet<&Share> = best
        .combinations
        .iter()
        .flatten()
        .map(|&idx| &shares[idx])
        .collect();
    let mut seen = HashSet::with_capacity(shares.len());
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for share in shares {
        if !seen.insert(share) {
            continue;
        }
        if contributing.contains(share) {
            valid.push(share.clone());
        } else {
            invalid.push(share.clone());
        }
    }

    info!(
        secret = %best.secret,
        support = best.count,
        evaluated,
        skipped,
        invalid = invalid.len(),
        "selected majority secret"
    );

    let secret = best.secret.clone();
    let support = best.count;
    Ok(Reconstruction {
        secret,
        support,
        valid,
        invalid,
        tally: table.entries,
        evaluated,
        skipped,
    })
}

/// Interpolates every combination, preserving enumeration order.
fn evaluate(
    shares: &[Share],
    combos: &[Vec<usize>],
    options: &ReconstructOptions,
) -> Vec<Result<BigInt, ShareError>> {
    let mode = options.mode;
    let run = |idx: &Vec<usize>| {
        let combo: Vec<Share> = idx.iter().map(|&i| shares[i].clone()).collect();
        interpolate_at_zero_with(&combo, mode)
    };
    if use_parallel(options.parallelism, combos.len()) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            return combos.par_iter().map(&run).collect();
        }
    }
    combos.iter().map(&run).collect()
}

fn use_parallel(parallelism: Parallelism, jobs: usize) -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    {
        match parallelism {
            Parallelism::Sequential => false,
            Parallelism::Parallel => true,
            Parallelism::Auto => jobs >= PARALLEL_THRESHOLD && rayon::current_num_threads() > 1,
        }
    }
    #[cfg(target_arch = "wasm32")]
    {
        let _ = (parallelism, jobs);
        false
    }
}

fn render(shares: &[Share], combo: &[usize]) -> String {
    combo
        .iter()
        .map(|&i| shares[i].to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn shares(points: &[(i64, i64)]) -> Vec<Share> {
        points
            .iter()
            .map(|&(x, y)| Share::from_i64(x, y).unwrap())
            .collect()
    }

    fn eval(coeffs: &[BigInt], x: i64) -> BigInt {
        let x = BigInt::from(x);
        coeffs
            .iter()
            .rev()
            .fold(BigInt::zero(), |acc, c| acc * &x + c)
    }

    #[test]
    fn test_all_collinear_shares_valid() {
        let input = shares(&[(1, 3), (2, 5), (3, 7)]);
        let result = reconstruct(&input, 2).unwrap();
        assert_eq!(result.secret, BigInt::from(1));
        assert_eq!(result.support, 3);
        assert_eq!(result.valid, input);
        assert!(result.invalid.is_empty());
        assert_eq!(result.tally.len(), 1);
    }

    #[test]
    fn test_three_way_tie_goes_to_first_seen() {
        let input = shares(&[(1, 3), (2, 5), (3, 99)]);
        let result = reconstruct(&input, 2).unwrap();
        let secrets: Vec<BigInt> = result.tally.iter().map(|t| t.secret.clone()).collect();
        assert_eq!(
            secrets,
            vec![BigInt::from(1), BigInt::from(-45), BigInt::from(-183)]
        );
        assert!(result.tally.iter().all(|t| t.count == 1));
        assert_eq!(result.secret, BigInt::from(1));
        assert_eq!(result.valid, shares(&[(1, 3), (2, 5)]));
        assert_eq!(result.invalid, shares(&[(3, 99)]));
    }

    #[test]
    fn test_noise_share_outvoted() {
        let input = shares(&[(1, 3), (2, 5), (3, 7), (4, 100)]);
        let result = reconstruct(&input, 2).unwrap();
        assert_eq!(result.secret, BigInt::from(1));
        assert_eq!(result.support, 3);
        assert_eq!(result.evaluated, 6);
        assert_eq!(result.skipped, 0);
        assert!(result.is_valid(&input[2]));
        assert_eq!(result.invalid, shares(&[(4, 100)]));
    }

    #[test]
    fn test_quadratic_with_corrupted_share() {
        // f(x) = 144·(5 + 2x + 3x²); the factor keeps every truncated term exact.
        let mut points: Vec<(i64, i64)> = (1..=6)
            .map(|x| (x, 144 * (5 + 2 * x + 3 * x * x)))
            .collect();
        points[5].1 = 1000;
        let input = shares(&points);
        let result = reconstruct(&input, 3).unwrap();
        assert_eq!(result.secret, BigInt::from(720));
        assert_eq!(result.support, 10);
        assert_eq!(result.valid, input[..5].to_vec());
        assert_eq!(result.invalid, vec![input[5].clone()]);
    }

    #[test]
    fn test_exact_mode_on_random_polynomial() {
        let mut rng = StdRng::seed_from_u64(7);
        let coeffs: Vec<BigInt> = (0..4)
            .map(|_| BigInt::from(rng.gen_range(-1_000_000i64..1_000_000)))
            .collect();
        let mut input: Vec<Share> = (1..=7)
            .map(|x| Share::new(BigInt::from(x), eval(&coeffs, x)).unwrap())
            .collect();
        let bad = Share::new(BigInt::from(7), eval(&coeffs, 7) + BigInt::from(5000)).unwrap();
        input[6] = bad.clone();
        let options = ReconstructOptions {
            mode: InterpolationMode::Exact,
            ..ReconstructOptions::default()
        };
        let result = reconstruct_with(&input, 4, &options).unwrap();
        assert_eq!(result.secret, coeffs[0]);
        assert_eq!(result.support, 15);
        assert_eq!(result.invalid, vec![bad]);
    }

    #[test]
    fn test_duplicate_abscissa_combination_skipped() {
        let input = shares(&[(1, 3), (1, 4), (2, 5), (3, 7)]);
        let result = reconstruct(&input, 2).unwrap();
        assert_eq!(result.skipped, 1);
        assert_eq!(result.evaluated, 5);
        assert_eq!(result.secret, BigInt::from(1));
        assert_eq!(result.support, 3);
        assert_eq!(result.invalid, shares(&[(1, 4)]));
    }

    #[test]
    fn test_threshold_too_small() {
        let input = shares(&[(1, 3), (2, 5)]);
        assert_eq!(
            reconstruct(&input, 1),
            Err(ShareError::ThresholdTooSmall { k: 1 })
        );
        assert_eq!(
            reconstruct(&[], 0),
            Err(ShareError::ThresholdTooSmall { k: 0 })
        );
    }

    #[test]
    fn test_empty_result() {
        let input = shares(&[(1, 3), (2, 5)]);
        assert_eq!(reconstruct(&input, 3), Err(ShareError::EmptyResult));
        assert_eq!(reconstruct(&input[..1], 2), Err(ShareError::EmptyResult));
        let clashing = shares(&[(1, 2), (1, 3)]);
        assert_eq!(reconstruct(&clashing, 2), Err(ShareError::EmptyResult));
    }

    #[test]
    fn test_tie_break_follows_input_order() {
        // Two unrelated lines: y = 2x + 1 and y = 3x + 2.
        let forward = shares(&[(1, 3), (2, 5), (3, 11), (4, 14)]);
        let result = reconstruct(&forward, 2).unwrap();
        assert!(result.tally.iter().all(|t| t.count == 1));
        assert_eq!(result.secret, BigInt::from(1));

        let mut backward = forward.clone();
        backward.reverse();
        let result = reconstruct(&backward, 2).unwrap();
        assert_eq!(result.secret, BigInt::from(2));
        assert_eq!(result.valid, shares(&[(4, 14), (3, 11)]));
    }

    #[test]
    fn test_duplicate_input_shares_listed_once() {
        let input = shares(&[(1, 3), (2, 5), (2, 5), (3, 7)]);
        let result = reconstruct(&input, 2).unwrap();
        assert_eq!(result.secret, BigInt::from(1));
        assert_eq!(result.skipped, 1);
        assert_eq!(result.valid, shares(&[(1, 3), (2, 5), (3, 7)]));
        assert!(result.invalid.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut points: Vec<(i64, i64)> = (1..=12).map(|x| (x, 6 * x + 42)).collect();
        points[3].1 = -17;
        points[8].1 = 123_456;
        let input = shares(&points);
        let sequential = reconstruct_with(
            &input,
            3,
            &ReconstructOptions {
                mode: InterpolationMode::Exact,
                parallelism: Parallelism::Sequential,
            },
        )
        .unwrap();
        let parallel = reconstruct_with(
            &input,
            3,
            &ReconstructOptions {
                mode: InterpolationMode::Exact,
                parallelism: Parallelism::Parallel,
            },
        )
        .unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.secret, BigInt::from(42));
        assert_eq!(sequential.invalid, shares(&[(4, -17), (9, 123_456)]));
    }

    fn sorted(mut shares: Vec<Share>) -> Vec<Share> {
        shares.sort_by(|a, b| a.x().cmp(b.x()));
        shares
    }

    const MAJORITY: [(i64, i64); 5] = [(1, 3), (2, 5), (3, 7), (4, 100), (5, 11)];

    #[test]
    fn test_clear_majority_independent_of_input_order() {
        let forward = shares(&MAJORITY);
        let baseline = reconstruct(&forward, 2).unwrap();
        assert_eq!(baseline.secret, BigInt::from(1));
        assert_eq!(baseline.support, 6);
        assert_eq!(baseline.invalid, shares(&[(4, 100)]));

        let permuted = shares(&[(4, 100), (5, 11), (2, 5), (1, 3), (3, 7)]);
        let result = reconstruct(&permuted, 2).unwrap();
        assert_eq!(result.secret, baseline.secret);
        assert_eq!(result.support, baseline.support);
        assert_eq!(result.invalid, baseline.invalid);
        assert_eq!(sorted(result.valid), sorted(baseline.valid));
    }

    proptest! {
        #[test]
        fn prop_clear_majority_survives_shuffles(
            permuted in Just(MAJORITY.to_vec()).prop_shuffle()
        ) {
            let result = reconstruct(&shares(&permuted), 2).unwrap();
            prop_assert_eq!(result.secret, BigInt::from(1));
            prop_assert_eq!(result.support, 6);
            prop_assert_eq!(result.invalid, shares(&[(4, 100)]));
            prop_assert_eq!(sorted(result.valid), shares(&[(1, 3), (2, 5), (3, 7), (5, 11)]));
        }
    }
}
