//! Core type definitions for the generational runner.
//!
//! The two extension traits, [`Algorithm`] and [`Analyzer`], define the
//! contract between the generic engine and a concrete problem. The engine
//! never looks inside a solution or an output; it only moves them between
//! the collaborators.

use crate::config::Parameters;
use crate::error::RunError;
use rand::Rng;

/// Score carried by candidates that have not been evaluated yet.
///
/// Offspring produced by recombination hold this value until the next
/// evaluation pass. It is the lowest representable score, so it can never
/// outrank a real one even when problem scores are negative.
///
/// An analyzer that returns `f64::NEG_INFINITY` produces a candidate that is
/// indistinguishable from an unscored one. It still takes part in ranking
/// and selection as the lowest possible score.
pub const UNSCORED: f64 = f64::NEG_INFINITY;

/// One population member: a solution paired with its latest score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate<S> {
    /// Score from the most recent evaluation, or [`UNSCORED`].
    pub score: f64,

    /// Opaque problem-specific representation.
    pub solution: S,
}

impl<S> Candidate<S> {
    /// Wraps a freshly produced solution that has not been scored yet.
    pub fn unscored(solution: S) -> Self {
        Self {
            score: UNSCORED,
            solution,
        }
    }

    /// Returns `true` once an evaluation pass has assigned a score.
    ///
    /// A real score of `f64::NEG_INFINITY` also reports `false`; see
    /// [`UNSCORED`].
    pub fn is_scored(&self) -> bool {
        self.score != UNSCORED
    }
}

/// The best candidate seen over a whole run, together with the output it
/// produced.
#[derive(Debug, Clone)]
pub struct Incumbent<S, O> {
    pub score: f64,
    pub solution: S,
    pub output: O,
}

/// Problem-side strategy: turns solutions into outputs and breeds them.
///
/// This is the main trait users implement to plug a domain into the
/// runner. It covers:
///
/// 1. **Expression**: how a solution produces an output for a given input
/// 2. **Initialization**: how to create a random solution
/// 3. **Recombination**: how two parents produce a child, including any
///    crossover, mutation, and clamping the representation needs
///
/// # Thread Safety
///
/// `Algorithm` must be `Send + Sync` because the runner may call it from a
/// pool of workers. Every randomized method receives the worker's own RNG.
///
/// # Implementing
///
/// ```ignore
/// struct Shifts;
///
/// impl Algorithm for Shifts {
///     type Input = Vec<u8>;
///     type Solution = Vec<i32>;
///     type Output = Vec<u8>;
///     type Flags = ();
///     type Error = std::convert::Infallible;
///     // ...
/// }
/// ```
pub trait Algorithm: Send + Sync {
    /// Read-only data shared by the whole run.
    type Input: Sync;

    /// Candidate representation (the chromosome).
    type Solution: Clone + Send + Sync;

    /// Expressed form of a solution; the thing the [`Analyzer`] scores.
    type Output: Send;

    /// User-defined feature flags carried in [`Parameters`].
    type Flags: Sync;

    /// Failure raised by any of the methods below.
    type Error: std::error::Error + Send + 'static;

    /// Applies `solution` to `input` and returns the resulting output.
    fn generate_output(
        &self,
        solution: &Self::Solution,
        input: &Self::Input,
        params: &Parameters<Self::Flags>,
    ) -> Result<Self::Output, Self::Error>;

    /// Produces a random solution for the initial population.
    ///
    /// Called exactly once per population slot at the start of a run.
    fn generate_random_solution<R: Rng>(
        &self,
        input: &Self::Input,
        params: &Parameters<Self::Flags>,
        rng: &mut R,
    ) -> Result<Self::Solution, Self::Error>;

    /// Combines two parents into one child.
    ///
    /// Implementations are expected to apply crossover (weighted by
    /// [`Parameters::crossover_factor`]), mutation (per component, with
    /// probability [`Parameters::mutation_factor`]) and to clamp the result
    /// into the valid representation range.
    fn combine_nodes<R: Rng>(
        &self,
        left: &Self::Solution,
        right: &Self::Solution,
        params: &Parameters<Self::Flags>,
        rng: &mut R,
    ) -> Result<Self::Solution, Self::Error>;
}

/// Scoring strategy: rates outputs and decides when the search is done.
///
/// Higher scores are better. The type parameters are the output, solution
/// and feature-flag types of the [`Algorithm`] it is paired with, so one
/// analyzer can serve several algorithms that share an output shape.
pub trait Analyzer<O, S, F = ()>: Send + Sync {
    /// Failure raised by [`score`](Analyzer::score) or
    /// [`check_solution`](Analyzer::check_solution).
    type Error: std::error::Error + Send + 'static;

    /// Scores an output deterministically.
    fn score(&self, output: &O, params: &Parameters<F>) -> Result<f64, Self::Error>;

    /// Called after every evaluation pass with the best-ever candidate.
    ///
    /// Returning `true` ends the run before the next generation is bred.
    fn check_solution(&self, score: f64, solution: &S, output: &O) -> Result<bool, Self::Error>;
}

/// Error type of a run pairing algorithm `A` with analyzer `Z`.
pub type RunErrorFor<A, Z> = RunError<
    <A as Algorithm>::Error,
    <Z as Analyzer<
        <A as Algorithm>::Output,
        <A as Algorithm>::Solution,
        <A as Algorithm>::Flags,
    >>::Error,
>;

/// Borrowed collaborators and run inputs, shared read-only with workers.
pub(crate) struct Context<'a, A: Algorithm, Z> {
    pub params: &'a Parameters<A::Flags>,
    pub input: &'a A::Input,
    pub algorithm: &'a A,
    pub analyzer: &'a Z,
}
