//! Display functions for command results

use super::formatters::{create_progress_bar, entropy_bar, format_duration, format_opening};
use crate::commands::{AnalysisResult, BenchmarkResult, SearchResult};
use crate::opening::OpeningScore;
use crate::search::SearchStatus;
use colored::Colorize;

/// Print the ranked openings of a search
pub fn print_search_result(result: &SearchResult) {
    let outcome = &result.outcome;
    let ceiling = OpeningScore::ceiling(result.corpus_size);

    println!("\n{}", "═".repeat(60).cyan());
    println!(
        " {} {} ",
        "BEST OPENINGS:".bright_cyan().bold(),
        format!("{} words, {} objective", result.config.k, result.config.objective)
            .bright_yellow()
            .bold()
    );
    println!("{}", "═".repeat(60).cyan());

    println!(
        "\n🔍 {} pool words of {} ({} search)",
        outcome.pool, result.corpus_size, outcome.method
    );
    println!(
        "   Evaluations: {}   Time: {}",
        outcome.evaluations,
        format_duration(outcome.elapsed)
    );
    let status = outcome.status.to_string();
    match outcome.status {
        SearchStatus::ProvenOptimal => println!("   Status:      {}", status.green().bold()),
        SearchStatus::BestKnown => println!("   Status:      {}", status.yellow().bold()),
    }

    println!("\n📊 {}", "Ranking:".bright_cyan().bold());
    for (i, (candidate, words)) in outcome.candidates.iter().zip(&result.openings).enumerate() {
        let score = &candidate.score;
        let bar = entropy_bar(score.entropy, ceiling, 20);
        println!(
            "   {:>3}. {:<30} [{}] {}  worst {:>4}  groups {:>5}  exp {:.2}",
            i + 1,
            format_opening(words).bold(),
            bar.green(),
            format!("{:.4} bits", score.entropy).bright_yellow(),
            score.worst_case,
            score.groups,
            score.expected_remaining
        );
    }
}

/// Print the result of an opening analysis
pub fn print_analysis_result(result: &AnalysisResult) {
    let score = &result.score;

    println!("\n{}", "═".repeat(60).cyan());
    println!(
        " {} {} ",
        "OPENING ANALYSIS:".bright_cyan().bold(),
        format_opening(&result.words).bright_yellow().bold()
    );
    println!("{}", "═".repeat(60).cyan());

    let bar = entropy_bar(score.entropy, result.ceiling, 30);

    println!("\n📊 Against {} possible secrets:", result.corpus_size);
    println!(
        "   Entropy:     [{}] {}",
        bar.green(),
        format!("{:.3} / {:.3} bits", score.entropy, result.ceiling).bright_yellow()
    );
    println!("   Groups:      {}", score.groups);
    println!(
        "   Worst case:  {}",
        format!("{} secrets", score.worst_case).yellow()
    );
    println!(
        "   Expected:    {:.2} secrets remain",
        score.expected_remaining
    );

    println!("\n🧩 {}", "Compatibility:".bright_cyan().bold());
    println!(
        "   Information: {:.3} bits",
        result.compatibility.expected_information
    );
    println!(
        "   Compatible:  {:.2} words on average",
        result.compatibility.expected_compatible
    );

    if result.largest_groups.is_empty() {
        return;
    }
    println!("\n📈 {}", "Largest groups:".bright_cyan().bold());
    let largest = result.largest_groups[0].size as f64;
    for group in &result.largest_groups {
        let bar = create_progress_bar(group.size as f64, largest, 20);
        let more = group.size.saturating_sub(group.sample.len());
        let mut sample = group.sample.join(" ");
        if more > 0 {
            sample.push_str(&format!(" (+{more})"));
        }
        println!(
            "   {:>5} {} {}",
            group.size,
            bar.green(),
            sample.bright_black()
        );
    }
}

/// Print the result of a benchmark
pub fn print_benchmark_result(result: &BenchmarkResult) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} ", "BENCHMARK RESULTS".bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());

    for size in &result.sizes {
        println!(
            "\n📊 {}",
            format!("{} words", size.words).bright_cyan().bold()
        );

        let slowest = size
            .strategies
            .iter()
            .map(|timing| timing.mean.as_secs_f64())
            .fold(0.0, f64::max);
        let fastest = size.fastest().map(|timing| timing.strategy);

        for timing in &size.strategies {
            let bar = create_progress_bar(timing.mean.as_secs_f64(), slowest, 20);
            let name = format!("{:<12}", timing.strategy.name());
            let name = if Some(timing.strategy) == fastest {
                name.green().bold()
            } else {
                name.normal()
            };
            let check = if timing.agrees { "✓".green() } else { "✗ mismatch".red().bold() };
            println!(
                "   {name} {} {:>10} (best {:>10}) {check}",
                bar.bright_black(),
                format_duration(timing.mean),
                format_duration(timing.best)
            );
        }

        for opening in &size.openings {
            println!(
                "   k = {}: {:>10} per opening, mean entropy {}",
                opening.k,
                format_duration(opening.mean),
                format!("{:.3} bits", opening.mean_entropy).bright_yellow()
            );
        }
    }

    println!(
        "\n⏱  {} runs per measurement, {} total",
        result.runs,
        format_duration(result.duration)
    );
    if result.all_agree() {
        println!("{}", "✅ All strategies produced identical tensors".green().bold());
    } else {
        println!("{}", "❌ Strategies disagree".red().bold());
    }
}
