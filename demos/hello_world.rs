//! Shift-cipher puzzle: find per-character shifts that turn a random
//! lowercase string into `"Hello world!"`.
//!
//! Run with `cargo run --release --example hello_world`.

use algen::{run, Algorithm, Analyzer, Parameters};
use rand::Rng;
use std::convert::Infallible;
use std::time::Instant;

const TARGET: &[u8; 12] = b"Hello world!";
const MAX_SHIFT: i32 = 128;

type Shifts = [i32; 12];
type Shifted = [i32; 12];

fn random_shift<R: Rng>(rng: &mut R) -> i32 {
    rng.random_range(-MAX_SHIFT..=MAX_SHIFT)
}

struct ShiftAlgorithm;

impl Algorithm for ShiftAlgorithm {
    type Input = [u8; 12];
    type Solution = Shifts;
    type Output = Shifted;
    type Flags = ();
    type Error = Infallible;

    fn generate_output(&self, shifts: &Shifts, input: &[u8; 12], _params: &Parameters) -> Result<Shifted, Infallible> {
        Ok(std::array::from_fn(|i| i32::from(input[i]) + shifts[i]))
    }

    fn generate_random_solution<R: Rng>(
        &self,
        _input: &[u8; 12],
        _params: &Parameters,
        rng: &mut R,
    ) -> Result<Shifts, Infallible> {
        Ok(std::array::from_fn(|_| random_shift(rng)))
    }

    fn combine_nodes<R: Rng>(
        &self,
        left: &Shifts,
        right: &Shifts,
        params: &Parameters,
        rng: &mut R,
    ) -> Result<Shifts, Infallible> {
        let mut child: Shifts =
            std::array::from_fn(|i| if rng.random::<f64>() < params.crossover_factor { right[i] } else { left[i] });
        for gene in child.iter_mut() {
            if rng.random::<f64>() < params.mutation_factor {
                *gene = random_shift(rng);
            }
            *gene = (*gene).clamp(-MAX_SHIFT, MAX_SHIFT);
        }
        Ok(child)
    }
}

struct ShiftAnalyzer;

impl Analyzer<Shifted, Shifts> for ShiftAnalyzer {
    type Error = Infallible;

    fn score(&self, output: &Shifted, _params: &Parameters) -> Result<f64, Infallible> {
        Ok(output
            .iter()
            .zip(TARGET)
            .map(|(&c, &t)| {
                let diff = (c - i32::from(t)).abs().min(MAX_SHIFT);
                f64::from(MAX_SHIFT - diff)
            })
            .sum())
    }

    fn check_solution(&self, score: f64, _shifts: &Shifts, _output: &Shifted) -> Result<bool, Infallible> {
        Ok(score == f64::from(MAX_SHIFT) * TARGET.len() as f64)
    }
}

fn render(output: &Shifted) -> String {
    output
        .iter()
        .map(|&c| u8::try_from(c).map_or('?', char::from))
        .collect()
}

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let mut rng = rand::rng();
    let input: [u8; 12] = std::array::from_fn(|_| rng.random_range(b'a'..=b'z'));

    let params = Parameters::new(())
        .with_generations(1000)
        .with_population(5000)
        .with_elitism_factor(0.05)
        .with_crossover_factor(0.25)
        .with_mutation_factor(0.025)
        .with_tournament_size(7);

    println!("input: {}", String::from_utf8_lossy(&input));

    let started = Instant::now();
    match run(&params, &input, &ShiftAlgorithm, &ShiftAnalyzer) {
        Ok(result) => {
            println!(
                "winner: {:?} (score {}, {} generations, converged: {})",
                render(&result.best.output),
                result.best.score,
                result.generations,
                result.converged
            );
            println!("elapsed: {} ms", started.elapsed().as_millis());
        }
        Err(e) => eprintln!("run failed: {e}"),
    }
}
