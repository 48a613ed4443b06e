//! Nearest-neighbor scoring
//!
//! The "model" is the training set itself. A query is compared with every
//! exemplar by squared Euclidean distance, the `k` closest are kept and a
//! [`VotePolicy`] turns them into a single label.
//!
//! Neighbor order is fully deterministic: ascending distance, ties broken by
//! training-set position (first seen wins). Digit ties in the weighted vote
//! go to the smallest digit.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::bitmap::{Bitmap, Label};
use crate::error::{DigitsError, Result};
use crate::format::constants::DIGIT_COUNT;
use crate::validation::validate_same_shape;

/// One of the `k` closest training bitmaps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// Position in the training set
    pub index: usize,
    /// Squared distance to the query
    pub distance: u64,
    /// Label of the training bitmap
    pub label: Label,
}

/// Rule for turning the nearest neighbors into a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VotePolicy {
    /// Inverse-distance weighted vote among the `k` nearest
    #[default]
    Weighted,
    /// Label of the single closest exemplar
    Nearest,
    /// A digit held by more than half of the `k` nearest, otherwise unknown
    Majority,
}

/// Sum of squared per-pixel differences
///
/// Symmetric, never negative, and zero exactly when both grids hold the
/// same intensities. Labels are not compared.
pub fn distance(a: &Bitmap, b: &Bitmap) -> Result<u64> {
    validate_same_shape(a.shape(), b.shape())?;
    Ok(squared_distance(a.pixels(), b.pixels()))
}

/// Distance kernel over two equally sized row-major buffers
#[inline]
pub fn squared_distance(a: &[u8], b: &[u8]) -> u64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let diff = x.abs_diff(y) as u32;
            (diff * diff) as u64
        })
        .sum()
}

/// Distances from `query` to every training bitmap, in training order
pub fn distances(query: &Bitmap, training: &[Bitmap]) -> Result<Vec<u64>> {
    training.iter().map(|t| distance(query, t)).collect()
}

/// Pick the `k` smallest distances, ordered ascending, ties by index
///
/// `k` larger than the training set selects everything.
pub fn select_nearest(distances: &[u64], training: &[Bitmap], k: usize) -> Vec<Neighbor> {
    debug_assert_eq!(distances.len(), training.len());
    let mut order: Vec<(u64, usize)> = distances.iter().copied().zip(0..).collect();
    let k = k.min(order.len());
    if k == 0 {
        return Vec::new();
    }

    // (distance, index) pairs are unique, so an unstable partition is deterministic
    if k < order.len() {
        order.select_nth_unstable(k - 1);
        order.truncate(k);
    }
    order.sort_unstable();

    order
        .into_iter()
        .map(|(distance, index)| Neighbor {
            index,
            distance,
            label: training[index].label(),
        })
        .collect()
}

/// Apply `policy` to neighbors sorted by [`select_nearest`]
pub fn vote(policy: VotePolicy, neighbors: &[Neighbor]) -> Label {
    match policy {
        VotePolicy::Weighted => weighted_vote(neighbors),
        VotePolicy::Nearest => neighbors.first().map_or(Label::Unknown, |n| n.label),
        VotePolicy::Majority => majority_vote(neighbors),
    }
}

/// Inverse-distance weighted vote
///
/// With `S` the sum of the neighbor distances, a neighbor at distance `d`
/// adds `S / d` to its digit. A neighbor at distance zero is an exact match
/// and decides the vote on its own. Unlabeled neighbors add nothing.
///
/// `S` is common to every digit, so digits are ranked by their exact sum of
/// `1 / d` instead.
fn weighted_vote(neighbors: &[Neighbor]) -> Label {
    if let Some(exact) = neighbors.iter().find(|n| n.distance == 0) {
        return exact.label;
    }

    let mut weights = [Weight::ZERO; DIGIT_COUNT];
    for neighbor in neighbors {
        if let Some(d) = neighbor.label.as_digit() {
            weights[d as usize].add(neighbor.distance);
        }
    }

    argmax(&weights)
}

/// Strict majority of the neighbors, otherwise unknown
fn majority_vote(neighbors: &[Neighbor]) -> Label {
    let mut counts = [0usize; DIGIT_COUNT];
    for neighbor in neighbors {
        if let Some(d) = neighbor.label.as_digit() {
            counts[d as usize] += 1;
        }
    }

    counts
        .iter()
        .position(|&count| count * 2 > neighbors.len())
        .map_or(Label::Unknown, |d| Label::Digit(d as u8))
}

/// Largest positive weight; the smallest digit wins a tie
fn argmax(weights: &[Weight; DIGIT_COUNT]) -> Label {
    let mut best: Option<(usize, &Weight)> = None;
    for (digit, weight) in weights.iter().enumerate() {
        if weight.is_zero() {
            continue;
        }
        match best {
            Some((_, top)) if weight.compare(top) != Ordering::Greater => {}
            _ => best = Some((digit, weight)),
        }
    }
    best.map_or(Label::Unknown, |(digit, _)| Label::Digit(digit as u8))
}

/// Sum of reciprocal distances for one digit
///
/// Kept as a reduced fraction `num / den` while it fits in `u128`. Past that
/// point only the `f64` sum is left to compare with.
#[derive(Debug, Clone, Copy)]
struct Weight {
    exact: Option<(u128, u128)>,
    approx: f64,
}

impl Weight {
    const ZERO: Self = Self {
        exact: Some((0, 1)),
        approx: 0.0,
    };

    fn add(&mut self, distance: u64) {
        let d = u128::from(distance);
        self.exact = self.exact.and_then(|(num, den)| {
            let num = num.checked_mul(d)?.checked_add(den)?;
            let den = den.checked_mul(d)?;
            let g = gcd(num, den);
            Some((num / g, den / g))
        });
        self.approx += 1.0 / distance as f64;
    }

    fn is_zero(&self) -> bool {
        match self.exact {
            Some((num, _)) => num == 0,
            None => false,
        }
    }

    fn compare(&self, other: &Weight) -> Ordering {
        match (self.exact, other.exact) {
            (Some(a), Some(b)) => compare_fractions(a, b),
            _ => self.approx.total_cmp(&other.approx),
        }
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Order `a.0 / a.1` against `b.0 / b.1` by continued-fraction expansion
///
/// Works on quotients and remainders only, so it cannot overflow.
fn compare_fractions(mut a: (u128, u128), mut b: (u128, u128)) -> Ordering {
    let mut flipped = false;
    loop {
        let (qa, ra) = (a.0 / a.1, a.0 % a.1);
        let (qb, rb) = (b.0 / b.1, b.0 % b.1);
        let order = match (qa.cmp(&qb), ra, rb) {
            (Ordering::Equal, 0, 0) => Ordering::Equal,
            (Ordering::Equal, 0, _) => Ordering::Less,
            (Ordering::Equal, _, 0) => Ordering::Greater,
            (Ordering::Equal, _, _) => {
                // a.1 / ra against b.1 / rb, in reverse
                (a, b) = ((a.1, ra), (b.1, rb));
                flipped = !flipped;
                continue;
            }
            (order, _, _) => order,
        };
        return if flipped { order.reverse() } else { order };
    }
}

/// Reject argument combinations for which no classification is defined
pub const fn validate_arguments(training_len: usize, k: usize) -> Result<()> {
    if training_len == 0 {
        return Err(DigitsError::InvalidArgument("training set is empty"));
    }
    if k == 0 {
        return Err(DigitsError::InvalidArgument("k must be positive"));
    }
    Ok(())
}

/// Predict the label of `query` by weighted vote of its `k` nearest neighbors
pub fn classify(query: &Bitmap, training: &[Bitmap], k: usize) -> Result<Label> {
    classify_with(query, training, k, VotePolicy::Weighted)
}

/// Predict the label of `query` under an explicit vote policy
pub fn classify_with(
    query: &Bitmap,
    training: &[Bitmap],
    k: usize,
    policy: VotePolicy,
) -> Result<Label> {
    validate_arguments(training.len(), k)?;
    let distances = distances(query, training)?;
    let neighbors = select_nearest(&distances, training, k);
    Ok(vote(policy, &neighbors))
}
