//! Output formatting and styling module.
//!
//! All console output of the command-line tool goes through here. The
//! per-file and summary lines keep a fixed wording; colour is only used for
//! markers and errors.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extsort::output::OutputFormatter;
    /// OutputFormatter::error("Error organizing files: permission denied");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Reports a duplicate sent to quarantine.
    pub fn duplicate_moved(from: &str, folder: &str, dry_run: bool) {
        if dry_run {
            Self::plain(&format!("Duplicate found, would move: {} to {}", from, folder));
        } else {
            Self::plain(&format!("Duplicate found and moved: {} to {}", from, folder));
        }
    }

    /// Reports a planned classification move.
    pub fn would_move(from: &str, folder: &str) {
        Self::plain(&format!("Would move {} to {}", from, folder));
    }

    /// Prints the line that closes a successful pass.
    pub fn completed(base_path: &Path, dry_run: bool) {
        if dry_run {
            Self::dry_run_notice(&format!(
                "File organization planned in directory: {}",
                base_path.display()
            ));
        } else {
            Self::plain(&format!(
                "File organization completed in directory: {}",
                base_path.display()
            ));
        }
    }

    /// Prints one summary line for an extension.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extsort::output::OutputFormatter;
    /// // prints "\t- 3 .jpg file(s) moved to jpg folder."
    /// OutputFormatter::extension_summary(3, ".jpg", "jpg", false);
    /// ```
    pub fn extension_summary(count: usize, extension: &str, folder: &str, dry_run: bool) {
        Self::plain(&summary_line(count, extension, folder, dry_run));
    }

    /// Creates and returns a progress bar for hashing and moving files.
    ///
    /// The bar draws to stderr and stays hidden when stderr is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }
}

/// Formats the summary line for an extension.
pub fn summary_line(count: usize, extension: &str, folder: &str, dry_run: bool) -> String {
    let verb = if dry_run { "would be moved" } else { "moved" };
    format!(
        "\t- {} {} file(s) {} to {} folder.",
        count, extension, verb, folder
    )
}

/// Renders `path` relative to `base_path` as `./name`, or in full if it lies elsewhere.
pub fn display_relative(base_path: &Path, path: &Path) -> String {
    match path.strip_prefix(base_path) {
        Ok(relative) => Path::new(".").join(relative).display().to_string(),
        Err(_) => path.display().to_string(),
    }
}
