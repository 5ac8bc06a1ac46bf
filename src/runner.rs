//! Generational loop execution.
//!
//! [`Evolution`] drives a run one generation at a time:
//! initialization → evaluate → check → (rank → breed → swap → evaluate →
//! check)*. The helpers [`run`] and [`run_with_observer`] drive it to
//! completion.

use crate::breeding::rank;
use crate::config::Parameters;
use crate::error::ConfigError;
use crate::executor::Executor;
use crate::selection::{argmax, rank_key};
use crate::types::{Algorithm, Analyzer, Candidate, Context, Incumbent, RunErrorFor};
use std::iter;

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunResult<S, O> {
    /// The best candidate seen during the entire run, with its output.
    pub best: Incumbent<S, O>,

    /// Number of generations bred after the initial evaluation.
    pub generations: usize,

    /// Whether [`Analyzer::check_solution`] ended the run early.
    pub converged: bool,

    /// Incumbent score after each evaluation pass, starting with the
    /// initial population.
    pub score_history: Vec<f64>,
}

/// Score summary of one evaluated population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// 0 for the initial population.
    pub generation: usize,
    pub best: f64,
    pub mean: f64,
    pub worst: f64,
    /// Best-ever score up to and including this generation.
    pub incumbent: f64,
}

/// Where a run stands after its latest evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// More generations remain in the budget.
    Running,
    /// The analyzer reported a satisfying solution.
    Converged,
    /// The generation budget is used up.
    Exhausted,
    /// A collaborator failed; the run cannot continue.
    Aborted,
}

/// A run in progress.
///
/// Owns the two population buffers and the output buffer; borrows the
/// parameters, the input and both collaborators for its whole lifetime.
///
/// # Usage
///
/// ```ignore
/// let mut evolution = Evolution::start(&params, &input, &algorithm, &analyzer)?;
/// while evolution.status() == Status::Running {
///     if let Err(e) = evolution.step() {
///         // The incumbent found so far is still available.
///         eprintln!("aborted at {}: {e}", evolution.incumbent().score);
///     }
/// }
/// let result = evolution.finish();
/// ```
pub struct Evolution<'a, A, Z>
where
    A: Algorithm,
    Z: Analyzer<A::Output, A::Solution, A::Flags>,
{
    ctx: Context<'a, A, Z>,
    executor: Executor,
    population: Vec<Candidate<A::Solution>>,
    next: Vec<Candidate<A::Solution>>,
    outputs: Vec<Option<A::Output>>,
    incumbent: Incumbent<A::Solution, A::Output>,
    generation: usize,
    status: Status,
    score_history: Vec<f64>,
}

impl<'a, A, Z> Evolution<'a, A, Z>
where
    A: Algorithm,
    Z: Analyzer<A::Output, A::Solution, A::Flags>,
{
    /// Validates `params`, allocates the initial population, evaluates it
    /// and runs the first termination check.
    ///
    /// Configuration errors are returned before any collaborator is called.
    pub fn start(
        params: &'a Parameters<A::Flags>,
        input: &'a A::Input,
        algorithm: &'a A,
        analyzer: &'a Z,
    ) -> Result<Self, RunErrorFor<A, Z>> {
        params.validate()?;

        let ctx = Context {
            params,
            input,
            algorithm,
            analyzer,
        };
        let mut executor = Executor::new::<A::Error, Z::Error>(params.execution, params.seed)?;
        tracing::debug!(
            population = params.population,
            generations = params.generations,
            workers = executor.workers(),
            elites = params.elite_count(),
            "starting run"
        );

        let mut population = executor.populate(&ctx)?;
        let mut outputs: Vec<Option<A::Output>> =
            iter::repeat_with(|| None).take(population.len()).collect();
        executor.evaluate(&ctx, &mut population, &mut outputs)?;

        let Some(incumbent) = best_of_pass(&population, &mut outputs) else {
            return Err(ConfigError::EmptyPopulation.into());
        };
        let next = population.clone();

        let mut evolution = Self {
            ctx,
            executor,
            population,
            next,
            outputs,
            incumbent,
            generation: 0,
            status: Status::Running,
            score_history: Vec::new(),
        };
        evolution.after_evaluation()?;
        Ok(evolution)
    }

    /// Breeds and evaluates one generation.
    ///
    /// Does nothing once the run has stopped. A collaborator error moves the
    /// run to [`Status::Aborted`]; [`incumbent`](Self::incumbent) and
    /// [`finish`](Self::finish) still report the best candidate found
    /// through the previous generation.
    pub fn step(&mut self) -> Result<Status, RunErrorFor<A, Z>> {
        if self.status != Status::Running {
            return Ok(self.status);
        }
        if let Err(e) = self.advance() {
            self.status = Status::Aborted;
            return Err(e);
        }
        Ok(self.status)
    }

    fn advance(&mut self) -> Result<(), RunErrorFor<A, Z>> {
        rank(&mut self.population);
        self.executor.breed(&self.ctx, &self.population, &mut self.next)?;
        std::mem::swap(&mut self.population, &mut self.next);
        self.generation += 1;

        self.executor.evaluate(&self.ctx, &mut self.population, &mut self.outputs)?;
        if let Some(best) = best_of_pass(&self.population, &mut self.outputs) {
            if rank_key(best.score) > rank_key(self.incumbent.score) {
                self.incumbent = best;
            }
        }
        self.after_evaluation()
    }

    /// Records the pass and decides whether the run continues.
    fn after_evaluation(&mut self) -> Result<(), RunErrorFor<A, Z>> {
        self.score_history.push(self.incumbent.score);
        tracing::debug!(
            generation = self.generation,
            best = self.population.iter().map(|c| c.score).fold(f64::NEG_INFINITY, f64::max),
            incumbent = self.incumbent.score,
            "generation evaluated"
        );

        let done = self
            .ctx
            .analyzer
            .check_solution(
                self.incumbent.score,
                &self.incumbent.solution,
                &self.incumbent.output,
            )
            .map_err(RunErrorFor::<A, Z>::Analyzer)?;

        self.status = if done {
            tracing::info!(
                generation = self.generation,
                score = self.incumbent.score,
                "solution accepted"
            );
            Status::Converged
        } else if self.generation >= self.ctx.params.generations {
            Status::Exhausted
        } else {
            Status::Running
        };
        Ok(())
    }

    /// Current state of the run.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Generations bred so far (0 right after [`start`](Self::start)).
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best-ever candidate and its output.
    pub fn incumbent(&self) -> &Incumbent<A::Solution, A::Output> {
        &self.incumbent
    }

    /// The latest evaluated population, in slot order.
    pub fn population(&self) -> &[Candidate<A::Solution>] {
        &self.population
    }

    /// Score summary of the latest evaluated population.
    pub fn stats(&self) -> GenerationStats {
        let n = self.population.len() as f64;
        let (best, worst, sum) = self.population.iter().fold(
            (f64::NEG_INFINITY, f64::INFINITY, 0.0),
            |(best, worst, sum), c| (best.max(c.score), worst.min(c.score), sum + c.score),
        );
        GenerationStats {
            generation: self.generation,
            best,
            mean: sum / n,
            worst,
            incumbent: self.incumbent.score,
        }
    }

    /// Ends the run and returns its result.
    pub fn finish(self) -> RunResult<A::Solution, A::Output> {
        tracing::info!(
            generations = self.generation,
            score = self.incumbent.score,
            converged = self.status == Status::Converged,
            "run finished"
        );
        RunResult {
            best: self.incumbent,
            generations: self.generation,
            converged: self.status == Status::Converged,
            score_history: self.score_history,
        }
    }
}

/// Takes the best candidate of an evaluated pass, moving its output out of
/// the buffer.
fn best_of_pass<S: Clone, O>(
    population: &[Candidate<S>],
    outputs: &mut [Option<O>],
) -> Option<Incumbent<S, O>> {
    let idx = argmax(population)?;
    let output = outputs[idx].take()?;
    let candidate = &population[idx];
    Some(Incumbent {
        score: candidate.score,
        solution: candidate.solution.clone(),
        output,
    })
}

/// Runs a complete search and returns the best candidate found.
///
/// Stops after `params.generations` bred generations, or earlier when the
/// analyzer accepts the incumbent.
///
/// # Errors
///
/// Returns [`RunError::Config`](crate::RunError::Config) before any
/// generation runs if `params` is invalid, and the first collaborator
/// failure otherwise.
pub fn run<A, Z>(
    params: &Parameters<A::Flags>,
    input: &A::Input,
    algorithm: &A,
    analyzer: &Z,
) -> Result<RunResult<A::Solution, A::Output>, RunErrorFor<A, Z>>
where
    A: Algorithm,
    Z: Analyzer<A::Output, A::Solution, A::Flags>,
{
    run_with_observer(params, input, algorithm, analyzer, |_| {})
}

/// Like [`run`], calling `observer` after every evaluation pass.
///
/// Useful for logging, progress reporting or plotting convergence.
pub fn run_with_observer<A, Z, F>(
    params: &Parameters<A::Flags>,
    input: &A::Input,
    algorithm: &A,
    analyzer: &Z,
    mut observer: F,
) -> Result<RunResult<A::Solution, A::Output>, RunErrorFor<A, Z>>
where
    A: Algorithm,
    Z: Analyzer<A::Output, A::Solution, A::Flags>,
    F: FnMut(&GenerationStats),
{
    let mut evolution = Evolution::start(params, input, algorithm, analyzer)?;
    observer(&evolution.stats());
    while evolution.status() == Status::Running {
        evolution.step()?;
        observer(&evolution.stats());
    }
    Ok(evolution.finish())
}

// ============================================================================
// Tests
// ============================================================================
