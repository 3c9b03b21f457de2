//! Terminal output formatting
//!
//! Display utilities for command results, plus the JSON search report.

pub mod display;
pub mod formatters;
pub mod json;

pub use display::{print_analysis_result, print_benchmark_result, print_search_result};
pub use json::{SearchReport, write_report};
