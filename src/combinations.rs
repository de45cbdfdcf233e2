//! Exhaustive k-subset enumeration.
//!
//! Combinations are produced in lexicographic order of input indices using an
//! explicit index stack instead of recursion.  The order matters to callers:
//! the consensus engine breaks ties by first appearance, so the enumeration
//! has to be deterministic for a fixed input order.

/// Lazy iterator over the index sets of all `k`-element subsets of `0..n`.
///
/// Each item is a strictly increasing vector of `k` indices.  For `k > n`
/// the iterator is empty; for `k = 0` it yields a single empty vector.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    /// Starts an enumeration of the `k`-subsets of `0..n`.
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }

    // Moves the stack to the next subset; returns false once exhausted.
    fn advance(&mut self) -> bool {
        let k = self.indices.len();
        let mut i = k;
        while i > 0 {
            i -= 1;
            if self.indices[i] < self.n - k + i {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();
        if !self.advance() {
            self.done = true;
        }
        Some(current)
    }
}

/// Returns every `k`-element combination of `items`, preserving input order.
///
/// Out-of-range thresholds (`k > items.len()`) yield an empty vector rather
/// than an error.
///
/// ```
/// use shamir_vote::combinations::generate;
///
/// let combos = generate(&['a', 'b', 'c'], 2);
/// assert_eq!(combos, vec![vec!['a', 'b'], vec!['a', 'c'], vec!['b', 'c']]);
/// assert!(generate(&['a'], 2).is_empty());
/// ```
pub fn generate<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    Combinations::new(items.len(), k)
        .map(|idx| idx.into_iter().map(|i| items[i].clone()).collect())
        .collect()
}

/// Computes `C(n, k)`, or `None` if the value does not fit in a `u128`.
pub fn binomial(n: usize, k: usize) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) is always divisible by (i + 1) at this point.
        acc = acc.checked_mul((n - i) as u128)? / (i as u128 + 1);
    }
    Some(acc)
}
