//! Status reporting
//!
//! Documents go to stdout; everything printed here goes to stderr so that
//! compiled output can be piped.

use colored::*;
use std::path::Path;
use std::time::Duration;

/// Summary statistics for a compile run
#[derive(Debug, Clone, Default)]
pub struct CompileSummary {
    pub files_read: usize,
    pub tables_compiled: usize,
    pub types_compiled: usize,
    pub tables_failed: usize,
    pub elapsed: Duration,
}

impl CompileSummary {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message);
}

/// Print the compile summary, naming the output file if there is one
pub fn print_compile_summary(summary: &CompileSummary, output: Option<&Path>) {
    let tables = summary.tables_compiled.to_string();
    let message = format!(
        "Compiled {} tables ({} types) from {} files in {:.2?}",
        tables.bold(),
        summary.types_compiled,
        summary.files_read,
        summary.elapsed
    );
    if summary.tables_failed > 0 {
        eprintln!(
            "{} {} tables failed to compile",
            "!".yellow(),
            summary.tables_failed.to_string().red()
        );
    }
    match output {
        Some(path) => print_success(&format!("{message} -> {}", path.display().to_string().cyan())),
        None => print_success(&message),
    }
}
