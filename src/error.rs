//! Error types.
//!
//! Configuration problems are rejected before any generation runs.
//! Collaborator failures abort the run and are handed back unchanged,
//! wrapped only to record which collaborator raised them.

use thiserror::Error;

/// An invalid [`Parameters`](crate::Parameters) value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("population must contain at least one candidate")]
    EmptyPopulation,

    #[error("tournament size {size} outside 1..={population}")]
    TournamentSize { size: usize, population: usize },

    #[error("{name} must lie in [0, 1], got {value}")]
    FactorOutOfRange { name: &'static str, value: f64 },

    #[error("parallel execution needs at least one worker")]
    NoWorkers,
}

/// Why a run stopped without producing a result.
///
/// `AE` is the [`Algorithm`](crate::Algorithm) error type and `ZE` the
/// [`Analyzer`](crate::Analyzer) error type.
#[derive(Error, Debug)]
pub enum RunError<AE, ZE>
where
    AE: std::error::Error + 'static,
    ZE: std::error::Error + 'static,
{
    #[error("invalid parameters: {0}")]
    Config(#[from] ConfigError),

    #[error("algorithm failed: {0}")]
    Algorithm(#[source] AE),

    #[error("analyzer failed: {0}")]
    Analyzer(#[source] ZE),

    #[cfg(feature = "parallel")]
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl<AE, ZE> RunError<AE, ZE>
where
    AE: std::error::Error + 'static,
    ZE: std::error::Error + 'static,
{
    /// Returns `true` if the run was rejected before the first generation.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
