//! Styled terminal output.
//!
//! Human-oriented text goes through these helpers. Machine-readable output
//! (`--json` reports, compiled filters) is printed plain so it can be piped.

use std::fmt::Display;

use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Failure,
}

/// Status lines other than success go to stderr.
fn status(tone: Tone, text: &str) {
    match tone {
        Tone::Success => println!("{} {}", "✔".green().bold(), text.green()),
        Tone::Warning => eprintln!("{} {}", "⚠".yellow().bold(), text.yellow()),
        Tone::Failure => eprintln!("{} {}", "✖".red().bold(), text.red()),
    }
}

/// Print a title underlined to its width
pub fn header(text: &str) {
    let rule = "─".repeat(text.chars().count());
    println!("\n{}\n{}\n", text.bold().cyan(), rule.dimmed());
}

/// Print a section header
pub fn section(text: &str) {
    println!("{}", text.bold());
}

/// Print an indented `key: value` line
pub fn kv(key: &str, value: impl Display) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a bulleted line
pub fn list_item(text: &str) {
    println!("  {} {}", "•".dimmed(), text);
}

pub fn newline() {
    println!();
}

/// Print dimmed text
pub fn dim(text: &str) {
    println!("{}", text.dimmed());
}

pub fn success(text: &str) {
    status(Tone::Success, text);
}

pub fn warn(text: &str) {
    status(Tone::Warning, text);
}

pub fn error(text: &str) {
    status(Tone::Failure, text);
}

/// Print a JSON document unstyled
pub fn json(text: &str) {
    println!("{text}");
}
