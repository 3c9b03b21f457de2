//! Command implementations
//!
//! Each command returns a result struct; rendering lives in [`crate::output`].

pub mod analyze;
pub mod benchmark;
pub mod search;

pub use analyze::{AnalysisResult, GroupSummary, analyze_opening};
pub use benchmark::{
    BenchmarkConfig, BenchmarkResult, OpeningTiming, SizeBenchmark, StrategyTiming, run_benchmark,
};
pub use search::{SearchResult, run_search};
