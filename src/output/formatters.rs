//! Formatting utilities for terminal output

use std::time::Duration;

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    let ratio = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    // Cast is safe: ratio is clamped to [0, 1]
    let filled = ((ratio * width as f64).round() as usize).min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Entropy as a bar relative to the highest entropy reachable
#[must_use]
pub fn entropy_bar(entropy: f64, ceiling: f64, width: usize) -> String {
    create_progress_bar(entropy, ceiling, width)
}

/// Opening words, upper-cased and joined
#[must_use]
pub fn format_opening<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| w.as_ref().to_uppercase())
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Human-scaled duration: µs, ms or s
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs >= 1.0 {
        format!("{secs:.2}s")
    } else if secs >= 1e-3 {
        format!("{:.2}ms", secs * 1e3)
    } else {
        format!("{:.1}µs", secs * 1e6)
    }
}
