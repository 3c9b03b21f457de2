//! Benchmark command
//!
//! Times every hint strategy over corpus prefixes of several sizes, checks
//! that they all build the same tensor, then times the evaluation of random
//! openings.

use crate::core::Corpus;
use crate::hints::{ComputeHints, HintEngine, HintStrategy, HintTensor};
use crate::opening::OpeningEvaluator;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use std::time::{Duration, Instant};

/// Benchmark parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    /// Corpus prefix sizes; sizes past the corpus are clamped
    pub sizes: Vec<usize>,
    /// Opening sizes to time
    pub openings: Vec<usize>,
    /// Repetitions per measurement
    pub runs: usize,
    /// Seed of the opening sampler
    pub seed: u64,
    /// Worker threads for the parallel strategy
    pub threads: Option<usize>,
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            sizes: vec![50, 100, 500, 1000, 2000],
            openings: vec![1, 2, 3],
            runs: 5,
            seed: 42,
            threads: None,
            show_progress: false,
        }
    }
}

/// Timing of one hint strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyTiming {
    pub strategy: HintStrategy,
    pub mean: Duration,
    pub best: Duration,
    /// Same tensor as the naive strategy
    pub agrees: bool,
}

/// Timing of random opening evaluations
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningTiming {
    pub k: usize,
    /// Mean time of one evaluation
    pub mean: Duration,
    pub mean_entropy: f64,
}

/// Measurements for one corpus size
#[derive(Debug, Clone, PartialEq)]
pub struct SizeBenchmark {
    pub words: usize,
    pub strategies: Vec<StrategyTiming>,
    pub openings: Vec<OpeningTiming>,
}

impl SizeBenchmark {
    /// Fastest strategy by mean time
    #[must_use]
    pub fn fastest(&self) -> Option<&StrategyTiming> {
        self.strategies.iter().min_by_key(|timing| timing.mean)
    }
}

/// Result of a benchmark run
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    pub sizes: Vec<SizeBenchmark>,
    pub runs: usize,
    pub duration: Duration,
}

impl BenchmarkResult {
    /// True if every strategy matched the reference at every size
    #[must_use]
    pub fn all_agree(&self) -> bool {
        self.sizes
            .iter()
            .all(|size| size.strategies.iter().all(|timing| timing.agrees))
    }
}

/// Run the benchmark over prefixes of `corpus`
///
/// # Errors
///
/// Returns an error if a strategy fails to build its tensor or a random
/// opening cannot be evaluated.
pub fn run_benchmark(corpus: &Corpus, config: &BenchmarkConfig) -> Result<BenchmarkResult> {
    let start = Instant::now();
    let runs = config.runs.max(1);

    let mut sizes: Vec<usize> = config
        .sizes
        .iter()
        .map(|&size| size.min(corpus.len()))
        .filter(|&size| size > 0)
        .collect();
    sizes.sort_unstable();
    sizes.dedup();

    let pb = progress_bar(sizes.len() as u64, config.show_progress);
    let mut results = Vec::with_capacity(sizes.len());
    let mut rng = StdRng::seed_from_u64(config.seed);

    for words in sizes {
        pb.set_message(format!("{words} words"));
        let prefix = corpus
            .truncated(words)
            .with_context(|| format!("cannot take the first {words} words"))?;

        let (reference, strategies) = time_strategies(&prefix, runs, config.threads)?;
        let openings = config
            .openings
            .iter()
            .filter(|&&k| k > 0 && k <= words)
            .map(|&k| time_openings(&reference, k, runs, &mut rng))
            .collect::<Result<Vec<_>>>()?;

        log::info!("benchmarked {words} words");
        results.push(SizeBenchmark {
            words,
            strategies,
            openings,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(BenchmarkResult {
        sizes: results,
        runs,
        duration: start.elapsed(),
    })
}

/// Time every strategy; returns the naive tensor alongside the timings
fn time_strategies(
    corpus: &Corpus,
    runs: usize,
    threads: Option<usize>,
) -> Result<(HintTensor, Vec<StrategyTiming>)> {
    let reference = HintEngine::new(HintStrategy::Naive).compute(corpus)?;
    let mut timings = Vec::with_capacity(HintStrategy::ALL.len());

    for strategy in HintStrategy::ALL {
        let engine = HintEngine::new(strategy).with_threads(threads);
        let mut total = Duration::ZERO;
        let mut best = Duration::MAX;
        let mut agrees = true;

        for _ in 0..runs {
            let start = Instant::now();
            let tensor = engine
                .compute(corpus)
                .with_context(|| format!("{strategy} strategy failed"))?;
            let elapsed = start.elapsed();
            total += elapsed;
            best = best.min(elapsed);
            agrees &= tensor == reference;
        }

        if !agrees {
            log::warn!("{strategy} strategy disagrees with the naive tensor");
        }
        log::debug!(
            "{strategy}: {:.3}ms mean over {} words",
            mean(total, runs).as_secs_f64() * 1000.0,
            corpus.len()
        );
        timings.push(StrategyTiming {
            strategy,
            mean: mean(total, runs),
            best,
            agrees,
        });
    }

    Ok((reference, timings))
}

fn time_openings(tensor: &HintTensor, k: usize, runs: usize, rng: &mut StdRng) -> Result<OpeningTiming> {
    let evaluator = OpeningEvaluator::new(tensor);
    let mut total = Duration::ZERO;
    let mut entropy = 0.0;

    for _ in 0..runs {
        let guesses = sample(rng, tensor.words(), k).into_vec();
        let start = Instant::now();
        let score = evaluator.evaluate(&guesses)?;
        total += start.elapsed();
        entropy += score.entropy;
    }

    Ok(OpeningTiming {
        k,
        mean: mean(total, runs),
        mean_entropy: entropy / runs as f64,
    })
}

fn mean(total: Duration, runs: usize) -> Duration {
    total / u32::try_from(runs).unwrap_or(u32::MAX)
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}
