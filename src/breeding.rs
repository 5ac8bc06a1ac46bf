//! Next-generation construction.
//!
//! The population is ranked best-first, then the next buffer is filled in
//! two phases:
//!
//! 1. **Elite pairs**: for `i in 0..elite_count / 2`, slot `2i` receives the
//!    `i`-th worst candidate and slot `2i + 1` the `i`-th best. Keeping both
//!    ends of the ranking preserves diversity.
//! 2. **Offspring**: every remaining slot gets a child of two
//!    tournament-selected parents, produced by
//!    [`Algorithm::combine_nodes`], marked as unscored.
//!
//! Offspring slots only read the current buffer, so disjoint slot ranges
//! can be bred concurrently.

use crate::selection::{rank_key, tournament};
use crate::types::{Algorithm, Analyzer, Candidate, Context, RunErrorFor};
use rand::Rng;
use std::cmp::Ordering;

/// Sorts candidates by descending score.
///
/// The sort is stable; NaN scores rank below every other score.
pub fn rank<S>(population: &mut [Candidate<S>]) {
    population.sort_by(|a, b| descending(a.score, b.score));
}

fn descending(a: f64, b: f64) -> Ordering {
    rank_key(b).total_cmp(&rank_key(a))
}

/// Copies the worst/best elite pairs of a ranked population into the first
/// `elite_count` slots of `next`.
///
/// # Panics
/// Panics if `elite_count` is odd or exceeds either buffer.
pub fn copy_elites<S: Clone>(ranked: &[Candidate<S>], next: &mut [Candidate<S>], elite_count: usize) {
    assert!(elite_count % 2 == 0, "elites are taken in pairs");
    assert!(elite_count <= ranked.len() && elite_count <= next.len());

    for i in 0..elite_count / 2 {
        next[2 * i].clone_from(&ranked[ranked.len() - 1 - i]);
        next[2 * i + 1].clone_from(&ranked[i]);
    }
}

/// Fills `slots` with unscored children of tournament-selected parents
/// drawn from `current`.
pub(crate) fn breed_shard<A, Z, R>(
    ctx: &Context<'_, A, Z>,
    current: &[Candidate<A::Solution>],
    slots: &mut [Candidate<A::Solution>],
    rng: &mut R,
) -> Result<(), RunErrorFor<A, Z>>
where
    A: Algorithm,
    Z: Analyzer<A::Output, A::Solution, A::Flags>,
    R: Rng,
{
    let k = ctx.params.tournament_size;
    for slot in slots.iter_mut() {
        let left = tournament(current, k, rng);
        let right = tournament(current, k, rng);
        let child = ctx
            .algorithm
            .combine_nodes(&current[left].solution, &current[right].solution, ctx.params, rng)
            .map_err(RunErrorFor::<A, Z>::Algorithm)?;
        *slot = Candidate::unscored(child);
    }
    Ok(())
}
