use owo_colors::OwoColorize;
use serapis_core::Record;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Serapis".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Extract term-bearing sentences from web pages\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Print what the record contains
pub fn print_record_summary(record: &Record) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Record".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("  {} {}", "Source:".dimmed(), record.source.bright_white());

    if let Some(title) = &record.title {
        eprintln!("  {} {}", "Title:".dimmed(), title.bright_white());
    }
    if let Some(author) = &record.author {
        eprintln!("  {} {}", "Author:".dimmed(), author.bright_white());
    }

    eprintln!(
        "  {} {}",
        "Sentences:".dimmed(),
        record.sentences.len().to_string().bright_white()
    );

    let variants = record.variants.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    eprintln!("  {} {}", "Variants:".dimmed(), variants.bright_white());

    if let Some(features) = record.features {
        eprintln!(
            "  {} {}  {} {}\n",
            "Highlighted:".dimmed(),
            yes_no(features.highlighted).bright_white(),
            "Quoted:".dimmed(),
            yes_no(features.quotes).bright_white()
        );
    }
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
