//! Parent selection.
//!
//! Tournament selection samples the population with replacement and keeps
//! the highest scorer. Higher tournament sizes raise selection pressure:
//! - k=1: uniform random choice
//! - k=2-5: moderate pressure
//! - k close to the population size: nearly always the best candidate
//!
//! # References
//!
//! - Miller & Goldberg (1995), "Genetic Algorithms, Tournament Selection,
//!   and the Effects of Noise"

use crate::types::Candidate;
use rand::Rng;

/// Tournament selection: draw `k` indices uniformly with replacement and
/// return the index of the best-scoring draw.
///
/// The same index may be drawn more than once. Ties go to the draw that
/// first reached the running maximum, so the result is deterministic for a
/// fixed RNG stream. A NaN score never beats a real one.
///
/// Drawing `k == population.len()` times is *not* the same as a full scan;
/// use [`argmax`] when every candidate must be considered.
///
/// # Complexity
/// O(k) per selection
///
/// # Panics
/// Panics if `population` is empty or `k` is zero.
pub fn tournament<S, R: Rng>(population: &[Candidate<S>], k: usize, rng: &mut R) -> usize {
    assert!(!population.is_empty(), "cannot select from empty population");
    assert!(k > 0, "tournament size must be positive");

    let n = population.len();
    best_of(population, (0..k).map(|_| rng.random_range(0..n)))
}

/// Comparison key for scores: NaN counts as the lowest possible score.
pub(crate) fn rank_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

/// Scans a draw sequence and keeps the first index reaching the maximum.
fn best_of<S>(population: &[Candidate<S>], mut draws: impl Iterator<Item = usize>) -> usize {
    let Some(mut best_idx) = draws.next() else {
        return 0;
    };
    for idx in draws {
        if rank_key(population[idx].score) > rank_key(population[best_idx].score) {
            best_idx = idx;
        }
    }
    best_idx
}

/// Index of the highest score, first occurrence winning ties.
///
/// NaN scores lose to every other score. Returns `None` for an empty slice.
pub fn argmax<S>(population: &[Candidate<S>]) -> Option<usize> {
    let mut iter = population.iter().enumerate();
    let (mut best_idx, first) = iter.next()?;
    let mut best_key = rank_key(first.score);
    for (i, c) in iter {
        let key = rank_key(c.score);
        if key > best_key {
            best_idx = i;
            best_key = key;
        }
    }
    Some(best_idx)
}
