//! Pluggable generational genetic algorithm runner.
//!
//! The engine owns the generational control flow (evaluation, ranking,
//! tournament selection, elitism, buffer management). The problem is
//! supplied through two strategy traits:
//!
//! - [`Algorithm`]: how a solution turns into an output, how random
//!   solutions are made, and how two parents combine into a child
//! - [`Analyzer`]: how an output is scored (higher is better) and when the
//!   search may stop early
//!
//! # Key Types
//!
//! - [`Parameters`]: run configuration (population, factors, tournament
//!   size, execution mode, seed)
//! - [`Evolution`]: a run driven one generation at a time
//! - [`run`] / [`run_with_observer`]: drive a run to completion
//! - [`RunResult`]: best-ever candidate with its output and run statistics
//!
//! # Generation cycle
//!
//! 1. Evaluate every slot (optionally sharded over a worker pool)
//! 2. Update the incumbent; ask the analyzer whether to stop
//! 3. Rank the population best-first
//! 4. Copy elite worst/best pairs, fill the rest with children of
//!    tournament-selected parents
//! 5. Swap buffers and repeat
//!
//! # Features
//!
//! - `parallel` (default): [`Execution::Parallel`] on a rayon thread pool
//! - `serde`: `Serialize`/`Deserialize` for [`Parameters`], [`Execution`]
//!   and [`Candidate`]
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

pub mod breeding;
mod config;
mod error;
mod evaluation;
mod executor;
mod runner;
pub mod selection;
mod types;

#[cfg(test)]
mod testkit;

pub use config::{Execution, Parameters};
pub use error::{ConfigError, RunError};
pub use runner::{run, run_with_observer, Evolution, GenerationStats, RunResult, Status};
pub use types::{Algorithm, Analyzer, Candidate, Incumbent, RunErrorFor, UNSCORED};
