use std::time::Duration;

use clipmark_core::CaptureResult;
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "clipmark".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Capture web pages as markdown\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print a labelled value, indented under the current step
pub fn print_field(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 50.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 100.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print what the capture found
pub fn print_capture_details(result: &CaptureResult) {
    let metadata = &result.conversion.metadata;

    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Capture Details".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    print_field("Title", &metadata.title);
    if !metadata.author.is_empty() {
        print_field("Author", &metadata.author);
    }
    print_field("Method", result.extraction.method.as_str());
    print_field("Words", &result.conversion.word_count.to_string());
    print_field("Reading time", &format!("{} min", metadata.estimated_reading_time));
    print_field("Images", &result.conversion.images.len().to_string());
    if !metadata.tags.is_empty() {
        print_field("Tags", &metadata.tags.join(", "));
    }
    eprintln!();
}

/// Print the content diagnostics requested with `--diagnostics`
pub fn print_diagnostics(quality: u8, paywalled: bool) {
    let score = format!("{}/100", quality);
    let score = if quality >= 60 {
        score.bright_green().to_string()
    } else if quality >= 30 {
        score.bright_yellow().to_string()
    } else {
        score.bright_red().to_string()
    };
    eprintln!("  {} {}", "Quality:".dimmed(), score);
    eprintln!("  {} {}", "Paywall:".dimmed(), if paywalled { "likely".bright_red().to_string() } else { "no".green().to_string() });
}

/// Print timing summary
pub fn print_timing_summary(total: Duration, timings: &[(&str, Duration)]) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Timing Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (label, duration) in timings {
        print_timing(label, *duration);
    }

    eprintln!("  {} {:>8.2}ms\n", "Total:".bold().dimmed(), total.as_secs_f64() * 1000.0);
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
    }
}
