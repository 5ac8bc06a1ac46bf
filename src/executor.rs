//! Work scheduling for a run.
//!
//! [`Executor`] owns every random stream of a run. In sequential mode there
//! is a single stream; in parallel mode each worker owns one stream and a
//! fixed contiguous shard of the buffers, so results depend only on the
//! seed and the worker count, never on thread timing.

use crate::breeding::{breed_shard, copy_elites};
use crate::config::Execution;
use crate::error::RunError;
use crate::evaluation::evaluate_shard;
use crate::types::{Algorithm, Analyzer, Candidate, Context, RunErrorFor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub(crate) enum Executor {
    Sequential {
        rng: StdRng,
    },
    #[cfg(feature = "parallel")]
    Parallel {
        pool: rayon::ThreadPool,
        rngs: Vec<StdRng>,
    },
}

impl Executor {
    /// Builds the executor and derives its random streams from `seed`.
    pub(crate) fn new<AE, ZE>(execution: Execution, seed: Option<u64>) -> Result<Self, RunError<AE, ZE>>
    where
        AE: std::error::Error + 'static,
        ZE: std::error::Error + 'static,
    {
        #[cfg_attr(not(feature = "parallel"), allow(unused_mut))]
        let mut master = StdRng::seed_from_u64(seed.unwrap_or_else(rand::random));
        match execution {
            Execution::Sequential => Ok(Self::Sequential { rng: master }),
            #[cfg(feature = "parallel")]
            Execution::Parallel { workers } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("algen-worker-{i}"))
                    .build()?;
                let rngs = (0..workers)
                    .map(|_| StdRng::seed_from_u64(master.random()))
                    .collect();
                Ok(Self::Parallel { pool, rngs })
            }
        }
    }

    /// Number of independent random streams (one per worker).
    pub(crate) fn workers(&self) -> usize {
        match self {
            Self::Sequential { .. } => 1,
            #[cfg(feature = "parallel")]
            Self::Parallel { rngs, .. } => rngs.len(),
        }
    }

    /// Allocates the initial population, one random solution per slot.
    pub(crate) fn populate<A, Z>(
        &mut self,
        ctx: &Context<'_, A, Z>,
    ) -> Result<Vec<Candidate<A::Solution>>, RunErrorFor<A, Z>>
    where
        A: Algorithm,
        Z: Analyzer<A::Output, A::Solution, A::Flags>,
    {
        let n = ctx.params.population;
        match self {
            Self::Sequential { rng } => populate_shard(ctx, n, rng),
            #[cfg(feature = "parallel")]
            Self::Parallel { pool, rngs } => {
                let chunk = shard_len(n, rngs.len());
                let sizes: Vec<usize> = (0..n).step_by(chunk).map(|start| chunk.min(n - start)).collect();
                let shards = pool.install(|| {
                    rngs.par_iter_mut()
                        .zip(sizes.into_par_iter())
                        .map(|(rng, len)| populate_shard(ctx, len, rng))
                        .collect::<Result<Vec<_>, _>>()
                })?;
                Ok(shards.into_iter().flatten().collect())
            }
        }
    }

    /// Scores every slot; returns once the whole population is scored.
    pub(crate) fn evaluate<A, Z>(
        &mut self,
        ctx: &Context<'_, A, Z>,
        population: &mut [Candidate<A::Solution>],
        outputs: &mut [Option<A::Output>],
    ) -> Result<(), RunErrorFor<A, Z>>
    where
        A: Algorithm,
        Z: Analyzer<A::Output, A::Solution, A::Flags>,
    {
        match self {
            Self::Sequential { .. } => evaluate_shard(ctx, population, outputs),
            #[cfg(feature = "parallel")]
            Self::Parallel { pool, rngs } => {
                let chunk = shard_len(population.len(), rngs.len());
                pool.install(|| {
                    population
                        .par_chunks_mut(chunk)
                        .zip(outputs.par_chunks_mut(chunk))
                        .try_for_each(|(candidates, outputs)| evaluate_shard(ctx, candidates, outputs))
                })
            }
        }
    }

    /// Builds the next generation from a ranked `current` buffer into
    /// `next`: elite pairs first, offspring in the remaining slots.
    pub(crate) fn breed<A, Z>(
        &mut self,
        ctx: &Context<'_, A, Z>,
        current: &[Candidate<A::Solution>],
        next: &mut [Candidate<A::Solution>],
    ) -> Result<(), RunErrorFor<A, Z>>
    where
        A: Algorithm,
        Z: Analyzer<A::Output, A::Solution, A::Flags>,
    {
        let elite_count = ctx.params.elite_count();
        copy_elites(current, next, elite_count);
        let offspring = &mut next[elite_count..];

        match self {
            Self::Sequential { rng } => breed_shard(ctx, current, offspring, rng),
            #[cfg(feature = "parallel")]
            Self::Parallel { pool, rngs } => {
                let chunk = shard_len(offspring.len(), rngs.len());
                pool.install(|| {
                    offspring
                        .par_chunks_mut(chunk)
                        .zip(rngs.par_iter_mut())
                        .try_for_each(|(slots, rng)| breed_shard(ctx, current, slots, rng))
                })
            }
        }
    }
}

fn populate_shard<A, Z, R>(
    ctx: &Context<'_, A, Z>,
    len: usize,
    rng: &mut R,
) -> Result<Vec<Candidate<A::Solution>>, RunErrorFor<A, Z>>
where
    A: Algorithm,
    Z: Analyzer<A::Output, A::Solution, A::Flags>,
    R: Rng,
{
    (0..len)
        .map(|_| {
            ctx.algorithm
                .generate_random_solution(ctx.input, ctx.params, rng)
                .map(Candidate::unscored)
                .map_err(RunErrorFor::<A, Z>::Algorithm)
        })
        .collect()
}

/// Length of each contiguous shard when `len` slots are split across
/// `workers`; the last shard may be shorter.
#[cfg(feature = "parallel")]
fn shard_len(len: usize, workers: usize) -> usize {
    len.div_ceil(workers.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{OneMax, Scripted};
    use crate::Parameters;
    use std::convert::Infallible;

    fn new_executor(execution: Execution, seed: u64) -> Executor {
        Executor::new::<Infallible, Infallible>(execution, Some(seed)).unwrap()
    }

    #[test]
    fn test_sequential_populate_fills_every_slot() {
        let params = Parameters::new(()).with_population(7);
        let problem = Scripted::with_initial(&[1.0, 2.0, 3.0]);
        let ctx = Context {
            params: &params,
            input: &(),
            algorithm: &problem,
            analyzer: &problem,
        };
        let mut executor = new_executor(Execution::Sequential, 1);

        let population = executor.populate(&ctx).unwrap();

        let solutions: Vec<f64> = population.iter().map(|c| c.solution).collect();
        assert_eq!(solutions, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0]);
        assert!(population.iter().all(|c| !c.is_scored()));
        assert_eq!(Scripted::count(&problem.generated), 7);
        assert_eq!(executor.workers(), 1);
    }

    #[test]
    fn test_same_seed_same_population() {
        let params = Parameters::new(()).with_population(16);
        let problem = OneMax::new(32);
        let ctx = Context {
            params: &params,
            input: &(),
            algorithm: &problem,
            analyzer: &problem,
        };

        let make = || {
            let mut executor = new_executor(Execution::Sequential, 99);
            executor.populate(&ctx).unwrap()
        };
        assert_eq!(make(), make());
    }

    #[cfg(feature = "parallel")]
    mod parallel {
        use super::*;

        #[test]
        fn test_shard_len_covers_all_slots() {
            assert_eq!(shard_len(10, 3), 4);
            assert_eq!(shard_len(9, 3), 3);
            assert_eq!(shard_len(2, 4), 1);
            assert_eq!(shard_len(0, 4), 1);
            for len in 0..50 {
                for workers in 1..9 {
                    let chunk = shard_len(len, workers);
                    assert!(len.div_ceil(chunk) <= workers);
                }
            }
        }

        #[test]
        fn test_parallel_populate_matches_population_size() {
            let params = Parameters::new(()).with_population(10).with_workers(3);
            let problem = Scripted::with_initial(&[5.0]);
            let ctx = Context {
                params: &params,
                input: &(),
                algorithm: &problem,
                analyzer: &problem,
            };
            let mut executor = new_executor(params.execution, 3);
            assert_eq!(executor.workers(), 3);

            let population = executor.populate(&ctx).unwrap();
            assert_eq!(population.len(), 10);
            assert_eq!(Scripted::count(&problem.generated), 10);
        }

        #[test]
        fn test_parallel_evaluate_scores_every_slot() {
            let params = Parameters::new(()).with_population(11).with_workers(4);
            let problem = Scripted::default();
            let ctx = Context {
                params: &params,
                input: &(),
                algorithm: &problem,
                analyzer: &problem,
            };
            let mut executor = new_executor(params.execution, 3);

            let mut population: Vec<Candidate<f64>> =
                (0..11).map(|i| Candidate::unscored(i as f64)).collect();
            let mut outputs: Vec<Option<f64>> = vec![None; 11];
            executor.evaluate(&ctx, &mut population, &mut outputs).unwrap();

            for (i, (c, o)) in population.iter().zip(&outputs).enumerate() {
                assert_eq!(c.score, i as f64);
                assert_eq!(*o, Some(i as f64));
            }
        }

        #[test]
        fn test_parallel_breed_is_reproducible() {
            let params = Parameters::new(())
                .with_population(20)
                .with_elitism_factor(0.2)
                .with_tournament_size(3)
                .with_workers(4);
            let problem = OneMax::new(16);
            let ctx = Context {
                params: &params,
                input: &(),
                algorithm: &problem,
                analyzer: &problem,
            };

            let breed_once = || {
                let mut executor = new_executor(params.execution, 7);
                let mut current = executor.populate(&ctx).unwrap();
                let mut outputs: Vec<Option<usize>> = vec![None; 20];
                executor.evaluate(&ctx, &mut current, &mut outputs).unwrap();
                crate::breeding::rank(&mut current);
                let mut next = current.clone();
                executor.breed(&ctx, &current, &mut next).unwrap();
                (current, next)
            };

            let (current, a) = breed_once();
            let (_, b) = breed_once();
            assert_eq!(a, b);
            assert_eq!(a.len(), 20);
            // Four elites: two worst/best pairs, then unscored children.
            assert_eq!(a[0], current[19]);
            assert_eq!(a[1], current[0]);
            assert_eq!(a[2], current[18]);
            assert_eq!(a[3], current[1]);
            assert!(a[4..].iter().all(|c| !c.is_scored()));
        }

        #[test]
        fn test_parallel_breed_failure_propagates() {
            let params = Parameters::new(())
                .with_population(8)
                .with_elitism_factor(0.0)
                .with_tournament_size(2)
                .with_workers(2);
            let problem = Scripted {
                fail_combine_after: Some(3),
                ..Scripted::default()
            };
            let ctx = Context {
                params: &params,
                input: &(),
                algorithm: &problem,
                analyzer: &problem,
            };
            let mut executor = new_executor(params.execution, 5);
            let current: Vec<Candidate<f64>> = (0..8)
                .map(|i| Candidate {
                    score: i as f64,
                    solution: i as f64,
                })
                .collect();
            let mut next = current.clone();

            let err = executor.breed(&ctx, &current, &mut next).unwrap_err();
            assert!(matches!(err, RunError::Algorithm(_)));
        }
    }
}
