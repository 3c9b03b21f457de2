//! Wordle Openings - CLI
//!
//! Searches and analyzes multi-word Wordle openings over a word list.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wordle_openings::{
    commands::{BenchmarkConfig, analyze_opening, run_benchmark, run_search},
    core::{Alphabet, Corpus, Language},
    hints::{ComputeHints, HintEngine, HintStrategy, HintTensor},
    logging,
    output::{print_analysis_result, print_benchmark_result, print_search_result, write_report},
    search::{Budget, Objective, SearchConfig, SearchMethod, Surrogate},
    wordlists::{load_corpus, load_pool},
};

#[derive(Parser)]
#[command(
    name = "wordle_openings",
    about = "Find the most informative multi-word Wordle openings",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Word list file, one word per line
    #[arg(short = 'w', long, global = true)]
    words: Option<PathBuf>,

    /// Alphabet preset
    #[arg(short, long, global = true, value_enum, default_value_t = Language::English)]
    language: Language,

    /// Custom alphabet as a letter string (overrides --language)
    #[arg(long, global = true)]
    alphabet: Option<String>,

    /// Word length
    #[arg(short = 'L', long, global = true, default_value_t = 5)]
    length: usize,

    /// Hint tensor construction strategy
    #[arg(long, global = true, value_enum, default_value_t = HintStrategy::Parallel)]
    hints: HintStrategy,

    /// Worker threads (default: all cores)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,

    /// Verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the best k-word openings
    Search {
        /// Words per opening
        #[arg(short, default_value_t = 2)]
        k: usize,

        /// Restrict guesses to the words of this file
        #[arg(short, long)]
        pool: Option<PathBuf>,

        /// Number of ranked openings to report
        #[arg(short, long, default_value_t = 10)]
        top: usize,

        #[arg(long, value_enum, default_value_t = Objective::Entropy)]
        objective: Objective,

        #[arg(short, long, value_enum, default_value_t = SearchMethod::Auto)]
        method: SearchMethod,

        /// Stop after this many partition refinements
        #[arg(long)]
        max_evaluations: Option<u64>,

        /// Stop after this many seconds
        #[arg(long, value_name = "SECS")]
        time_limit: Option<f64>,

        /// Pool words kept by the integer program
        #[arg(long, default_value_t = 60)]
        shortlist: usize,

        /// Integer program model
        #[arg(long, value_enum, default_value_t = Surrogate::Pairwise)]
        surrogate: Surrogate,

        /// Only use pool words without repeated letters
        #[arg(long)]
        distinct_letters: bool,

        /// Write a JSON report to this file
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
    },

    /// Analyze one opening
    Analyze {
        /// Opening words
        #[arg(required = true)]
        words: Vec<String>,

        /// Number of largest groups to list
        #[arg(short, long, default_value_t = 5)]
        groups: usize,
    },

    /// Benchmark hint strategies and opening evaluation
    Benchmark {
        /// Corpus sizes, comma separated
        #[arg(long, value_delimiter = ',', default_value = "50,100,500,1000,2000")]
        sizes: Vec<usize>,

        /// Opening sizes, comma separated
        #[arg(long, value_delimiter = ',', default_value = "1,2,3")]
        openings: Vec<usize>,

        /// Repetitions per measurement
        #[arg(short, long, default_value_t = 5)]
        runs: usize,

        /// Seed for random openings
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("cannot configure the worker pool")?;
    }

    let Some(path) = cli.words.as_deref() else {
        bail!("no word list given, pass --words <PATH>");
    };
    let corpus = load_wordlist(path, &cli)?;
    let engine = HintEngine::new(cli.hints).with_threads(cli.threads);
    let show_progress = std::io::stderr().is_terminal();

    match cli.command {
        Commands::Search {
            k,
            pool,
            top,
            objective,
            method,
            max_evaluations,
            time_limit,
            shortlist,
            surrogate,
            distinct_letters,
            json,
        } => {
            let time_limit = time_limit
                .map(Duration::try_from_secs_f64)
                .transpose()
                .context("invalid --time-limit")?;
            let config = SearchConfig {
                k,
                top,
                objective,
                method,
                budget: Budget {
                    max_evaluations,
                    time_limit,
                },
                shortlist,
                surrogate,
                distinct_letters,
                show_progress,
                ..SearchConfig::default()
            };
            let tensor = build_tensor(&corpus, engine)?;
            run_search_command(&corpus, &tensor, pool.as_deref(), config, json.as_deref())
        }
        Commands::Analyze { words, groups } => {
            let tensor = build_tensor(&corpus, engine)?;
            run_analyze_command(&corpus, &tensor, &words, groups)
        }
        Commands::Benchmark {
            sizes,
            openings,
            runs,
            seed,
        } => {
            let config = BenchmarkConfig {
                sizes,
                openings,
                runs,
                seed,
                threads: cli.threads,
                show_progress,
            };
            run_benchmark_command(&corpus, &config)
        }
    }
}

fn load_wordlist(path: &Path, cli: &Cli) -> Result<Corpus> {
    let alphabet = match &cli.alphabet {
        Some(letters) => Alphabet::new(letters)
            .with_context(|| format!("invalid alphabet '{letters}': letters must be distinct, at most 64"))?,
        None => Alphabet::for_language(cli.language),
    };
    load_corpus(path, alphabet, cli.length)
        .with_context(|| format!("cannot load word list {}", path.display()))
}

fn build_tensor(corpus: &Corpus, engine: HintEngine) -> Result<HintTensor> {
    engine
        .compute(corpus)
        .context("cannot build the hint tensor")
}

fn run_search_command(
    corpus: &Corpus,
    tensor: &HintTensor,
    pool: Option<&Path>,
    config: SearchConfig,
    json: Option<&Path>,
) -> Result<()> {
    let pool = pool
        .map(|path| {
            load_pool(path, corpus).with_context(|| format!("cannot load pool {}", path.display()))
        })
        .transpose()?;

    let result = run_search(corpus, tensor, pool.as_deref(), config)?;
    print_search_result(&result);

    if let Some(path) = json {
        write_report(&result, path)?;
    }
    Ok(())
}

fn run_analyze_command(
    corpus: &Corpus,
    tensor: &HintTensor,
    words: &[String],
    groups: usize,
) -> Result<()> {
    let result = analyze_opening(corpus, tensor, words, groups)?;
    print_analysis_result(&result);
    Ok(())
}

fn run_benchmark_command(corpus: &Corpus, config: &BenchmarkConfig) -> Result<()> {
    println!(
        "Benchmarking {} hint strategies on up to {} words...",
        HintStrategy::ALL.len(),
        corpus.len()
    );
    let result = run_benchmark(corpus, config)?;
    print_benchmark_result(&result);
    Ok(())
}
