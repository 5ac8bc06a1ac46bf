//! Fitness evaluation.
//!
//! Each slot reads only its own solution and writes only its own score and
//! output, so any contiguous range of slots can be evaluated on its own.

use crate::types::{Algorithm, Analyzer, Candidate, Context, RunErrorFor};

/// Scores every candidate in a shard and stores the output it produced.
///
/// `candidates` and `outputs` must cover the same slots. Stops at the first
/// collaborator failure; slots after it keep their previous values.
pub(crate) fn evaluate_shard<A, Z>(
    ctx: &Context<'_, A, Z>,
    candidates: &mut [Candidate<A::Solution>],
    outputs: &mut [Option<A::Output>],
) -> Result<(), RunErrorFor<A, Z>>
where
    A: Algorithm,
    Z: Analyzer<A::Output, A::Solution, A::Flags>,
{
    debug_assert_eq!(candidates.len(), outputs.len());

    for (candidate, slot) in candidates.iter_mut().zip(outputs.iter_mut()) {
        let output = ctx
            .algorithm
            .generate_output(&candidate.solution, ctx.input, ctx.params)
            .map_err(RunErrorFor::<A, Z>::Algorithm)?;
        candidate.score = ctx
            .analyzer
            .score(&output, ctx.params)
            .map_err(RunErrorFor::<A, Z>::Analyzer)?;
        *slot = Some(output);
    }
    Ok(())
}
