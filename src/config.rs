//! Run configuration.
//!
//! [`Parameters`] holds every knob that controls a run. It is immutable once
//! the run starts and is handed to each collaborator call, so problem code
//! can read the factors and its own feature flags.

use crate::error::ConfigError;

/// How the per-generation work is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Execution {
    /// One thread evaluates, then breeds, every generation.
    #[default]
    Sequential,

    /// A fixed pool of `workers` threads, each owning a contiguous shard of
    /// the population and its own random stream.
    ///
    /// There are exactly two join points per generation: after evaluation
    /// and after breeding.
    #[cfg(feature = "parallel")]
    Parallel { workers: usize },
}

/// Parameters of a generational run.
///
/// `F` is an opaque bag of feature flags passed through to the
/// collaborators untouched.
///
/// # Defaults
///
/// ```
/// use algen::Parameters;
///
/// let params: Parameters = Parameters::default();
/// assert_eq!(params.population, 100);
/// assert_eq!(params.generations, 500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use algen::Parameters;
///
/// let params = Parameters::new(())
///     .with_population(200)
///     .with_tournament_size(5)
///     .with_elitism_factor(0.1)
///     .with_mutation_factor(0.05);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters<F = ()> {
    /// Number of breeding generations after the initial evaluation.
    pub generations: usize,

    /// Number of candidates per generation. Must be at least 1.
    pub population: usize,

    /// Fraction of the population carried over unchanged (0.0–1.0).
    ///
    /// Elites are taken in best/worst pairs; see
    /// [`elite_count`](Self::elite_count).
    pub elitism_factor: f64,

    /// Probability of taking a component from the right parent (0.0–1.0).
    ///
    /// Read by [`Algorithm::combine_nodes`](crate::Algorithm::combine_nodes);
    /// the engine itself never uses it.
    pub crossover_factor: f64,

    /// Per-component mutation probability (0.0–1.0).
    ///
    /// Read by [`Algorithm::combine_nodes`](crate::Algorithm::combine_nodes).
    pub mutation_factor: f64,

    /// Number of draws per tournament, `1..=population`.
    pub tournament_size: usize,

    /// Problem-specific flags.
    pub feature_flags: F,

    /// Scheduling of evaluation and breeding.
    pub execution: Execution,

    /// Run-level seed for reproducibility.
    ///
    /// Worker streams are derived from it deterministically. `None` draws a
    /// fresh seed.
    pub seed: Option<u64>,
}

impl<F: Default> Default for Parameters<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F> Parameters<F> {
    /// Default parameters carrying the given feature flags.
    pub fn new(feature_flags: F) -> Self {
        Self {
            generations: 500,
            population: 100,
            elitism_factor: 0.1,
            crossover_factor: 0.5,
            mutation_factor: 0.05,
            tournament_size: 3,
            feature_flags,
            execution: Execution::Sequential,
            seed: None,
        }
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the population size.
    pub fn with_population(mut self, n: usize) -> Self {
        self.population = n;
        self
    }

    /// Sets the elitism factor.
    pub fn with_elitism_factor(mut self, factor: f64) -> Self {
        self.elitism_factor = factor;
        self
    }

    /// Sets the crossover factor.
    pub fn with_crossover_factor(mut self, factor: f64) -> Self {
        self.crossover_factor = factor;
        self
    }

    /// Sets the mutation factor.
    pub fn with_mutation_factor(mut self, factor: f64) -> Self {
        self.mutation_factor = factor;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Replaces the feature flags, possibly changing their type.
    pub fn with_feature_flags<G>(self, feature_flags: G) -> Parameters<G> {
        Parameters {
            generations: self.generations,
            population: self.population,
            elitism_factor: self.elitism_factor,
            crossover_factor: self.crossover_factor,
            mutation_factor: self.mutation_factor,
            tournament_size: self.tournament_size,
            feature_flags,
            execution: self.execution,
            seed: self.seed,
        }
    }

    /// Sets the execution mode.
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Runs evaluation and breeding on a pool of `workers` threads.
    #[cfg(feature = "parallel")]
    pub fn with_workers(self, workers: usize) -> Self {
        self.with_execution(Execution::Parallel { workers })
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of candidates copied straight into the next generation.
    ///
    /// `floor(population * elitism_factor)`, rounded down to an even number
    /// because elites are always taken as a worst/best pair.
    pub fn elite_count(&self) -> usize {
        let raw = (self.population as f64 * self.elitism_factor).floor() as usize;
        let raw = raw.min(self.population);
        raw - raw % 2
    }

    /// Checks every parameter.
    ///
    /// Nothing is clamped or defaulted: the first invalid value is reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.tournament_size == 0 || self.tournament_size > self.population {
            return Err(ConfigError::TournamentSize {
                size: self.tournament_size,
                population: self.population,
            });
        }
        for (name, value) in [
            ("elitism_factor", self.elitism_factor),
            ("crossover_factor", self.crossover_factor),
            ("mutation_factor", self.mutation_factor),
        ] {
            // NaN fails the range check as well.
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::FactorOutOfRange { name, value });
            }
        }
        #[cfg(feature = "parallel")]
        if let Execution::Parallel { workers: 0 } = self.execution {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }
}
