//! Small problems shared by the unit tests.

use crate::{Algorithm, Analyzer, Parameters};
use rand::Rng;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

pub(crate) type Bits = Vec<bool>;

// ---- OneMax: maximize the number of set bits ----

pub(crate) struct OneMax {
    pub len: usize,
}

impl OneMax {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Algorithm for OneMax {
    type Input = ();
    type Solution = Bits;
    type Output = usize;
    type Flags = ();
    type Error = Infallible;

    fn generate_output(&self, bits: &Bits, _input: &(), _params: &Parameters) -> Result<usize, Infallible> {
        Ok(bits.iter().filter(|&&b| b).count())
    }

    fn generate_random_solution<R: Rng>(
        &self,
        _input: &(),
        _params: &Parameters,
        rng: &mut R,
    ) -> Result<Bits, Infallible> {
        Ok((0..self.len).map(|_| rng.random_bool(0.5)).collect())
    }

    fn combine_nodes<R: Rng>(
        &self,
        left: &Bits,
        right: &Bits,
        params: &Parameters,
        rng: &mut R,
    ) -> Result<Bits, Infallible> {
        Ok(left
            .iter()
            .zip(right)
            .map(|(&l, &r)| {
                let bit = if rng.random_bool(params.crossover_factor) { r } else { l };
                if rng.random_bool(params.mutation_factor) {
                    !bit
                } else {
                    bit
                }
            })
            .collect())
    }
}

impl Analyzer<usize, Bits> for OneMax {
    type Error = Infallible;

    fn score(&self, ones: &usize, _params: &Parameters) -> Result<f64, Infallible> {
        Ok(*ones as f64)
    }

    fn check_solution(&self, _score: f64, _bits: &Bits, ones: &usize) -> Result<bool, Infallible> {
        Ok(*ones == self.len)
    }
}

// ---- Scripted: solutions are their own score, with optional failures ----

#[derive(Error, Debug, Clone, PartialEq)]
#[error("scripted failure in {0}")]
pub(crate) struct ScriptError(pub &'static str);

/// Solutions are plain `f64` values scored as themselves.
///
/// Initial solutions are taken from `initial` in order (cycling), children
/// are the larger parent minus one, and any collaborator can be told to
/// fail once it has been called a given number of times.
#[derive(Default)]
pub(crate) struct Scripted {
    pub initial: Vec<f64>,
    pub stop_at: Option<f64>,
    pub fail_output_after: Option<usize>,
    pub fail_score_after: Option<usize>,
    pub fail_combine_after: Option<usize>,
    pub fail_check_after: Option<usize>,
    pub generated: AtomicUsize,
    pub outputs: AtomicUsize,
    pub scores: AtomicUsize,
    pub combined: AtomicUsize,
    pub checks: AtomicUsize,
}

impl Scripted {
    pub fn with_initial(initial: &[f64]) -> Self {
        Self {
            initial: initial.to_vec(),
            ..Self::default()
        }
    }

    pub fn failing_output_after(calls: usize) -> Self {
        Self {
            fail_output_after: Some(calls),
            ..Self::default()
        }
    }

    pub fn failing_score_after(calls: usize) -> Self {
        Self {
            fail_score_after: Some(calls),
            ..Self::default()
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn tick(counter: &AtomicUsize, limit: Option<usize>, what: &'static str) -> Result<(), ScriptError> {
    let n = counter.fetch_add(1, Ordering::SeqCst);
    match limit {
        Some(limit) if n >= limit => Err(ScriptError(what)),
        _ => Ok(()),
    }
}

impl Algorithm for Scripted {
    type Input = ();
    type Solution = f64;
    type Output = f64;
    type Flags = ();
    type Error = ScriptError;

    fn generate_output(&self, value: &f64, _input: &(), _params: &Parameters) -> Result<f64, ScriptError> {
        tick(&self.outputs, self.fail_output_after, "generate_output")?;
        Ok(*value)
    }

    fn generate_random_solution<R: Rng>(
        &self,
        _input: &(),
        _params: &Parameters,
        rng: &mut R,
    ) -> Result<f64, ScriptError> {
        let n = self.generated.fetch_add(1, Ordering::SeqCst);
        if self.initial.is_empty() {
            Ok(rng.random_range(0.0..100.0))
        } else {
            Ok(self.initial[n % self.initial.len()])
        }
    }

    fn combine_nodes<R: Rng>(
        &self,
        left: &f64,
        right: &f64,
        _params: &Parameters,
        _rng: &mut R,
    ) -> Result<f64, ScriptError> {
        tick(&self.combined, self.fail_combine_after, "combine_nodes")?;
        Ok(left.max(*right) - 1.0)
    }
}

impl Analyzer<f64, f64> for Scripted {
    type Error = ScriptError;

    fn score(&self, output: &f64, _params: &Parameters) -> Result<f64, ScriptError> {
        tick(&self.scores, self.fail_score_after, "score")?;
        Ok(*output)
    }

    fn check_solution(&self, score: f64, _solution: &f64, _output: &f64) -> Result<bool, ScriptError> {
        tick(&self.checks, self.fail_check_after, "check_solution")?;
        Ok(self.stop_at.is_some_and(|target| score >= target))
    }
}
