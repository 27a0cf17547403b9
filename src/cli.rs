//! Command-line interface module for extsort.
//!
//! This module handles:
//! - Argument parsing
//! - Loading the optional configuration file
//! - Running the organize pass with console reporting
//! - Printing the end-of-run summary

use crate::config::OrganizerConfig;
use crate::file_entry::{FileEntry, folder_name};
use crate::file_organizer::{OrganizeResult, Relocation};
use crate::organizer::{OrganizeObserver, OrganizeReport, Organizer, SkipReason};
use crate::output::{OutputFormatter, display_relative};
use clap::Parser;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// Sort files into extension folders and quarantine duplicate content.
#[derive(Debug, Parser)]
#[command(name = "extsort", version, about, long_about = None)]
pub struct Cli {
    /// Directory to organize (defaults to the directory holding this executable)
    pub directory: Option<PathBuf>,

    /// Show what would be moved without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// TOML file with quarantine and filter settings
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn organize_command(&self) -> OrganizeCommand {
        if self.dry_run {
            OrganizeCommand::DryRun
        } else {
            OrganizeCommand::Organize
        }
    }
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Organize files in a directory.
    Organize,
    /// Report what organizing would do without making changes.
    DryRun,
}

/// Runs a pass over `dir_path` with default settings.
///
/// # Examples
///
/// ```no_run
/// use extsort::cli::{run_cli, OrganizeCommand};
/// use std::path::Path;
///
/// match run_cli(OrganizeCommand::Organize, Some(Path::new("/path/to/directory"))) {
///     Ok(report) => println!("{} file(s) moved", report.relocations.len()),
///     Err(e) => eprintln!("Error organizing files: {}", e),
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, dir_path: Option<&Path>) -> OrganizeResult<OrganizeReport> {
    run_cli_with_config(command, dir_path, None)
}

/// Runs a pass over `dir_path`, with settings from `config_path` if given.
///
/// Duplicate lines are printed as they happen; the summary is printed only
/// when the pass completes.
pub fn run_cli_with_config(
    command: OrganizeCommand,
    dir_path: Option<&Path>,
    config_path: Option<&Path>,
) -> OrganizeResult<OrganizeReport> {
    let settings = OrganizerConfig::load(config_path)?.compile()?;
    let dry_run = command == OrganizeCommand::DryRun;
    let organizer = Organizer::with_settings(dir_path, settings)?.dry_run(dry_run);

    if dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            organizer.base_path().display()
        ));
    }

    let report = {
        let mut observer = ConsoleObserver::new(organizer.base_path(), dry_run);
        organizer.run(&mut observer)?
    };

    print_summary(&report);
    Ok(report)
}

/// Prints the completion line and one line per classified extension.
pub fn print_summary(report: &OrganizeReport) {
    OutputFormatter::completed(&report.base_path, report.dry_run);
    for (extension, count) in report.tally.iter() {
        OutputFormatter::extension_summary(count, extension, folder_name(extension), report.dry_run);
    }

    if report.dry_run {
        OutputFormatter::info(&format!(
            "Run 'extsort {}' (without --dry-run) to organize.",
            report.base_path.display()
        ));
    }
}

/// Clears the progress bar however the pass ends.
struct ProgressGuard(ProgressBar);

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}

/// Prints pass decisions to the console while a progress bar runs.
struct ConsoleObserver {
    base_path: PathBuf,
    dry_run: bool,
    progress: Option<ProgressGuard>,
}

impl ConsoleObserver {
    fn new(base_path: &Path, dry_run: bool) -> Self {
        Self {
            base_path: base_path.to_path_buf(),
            dry_run,
            progress: None,
        }
    }

    /// Prints without tearing the progress bar.
    fn print(&self, print: impl FnOnce()) {
        match &self.progress {
            Some(guard) => guard.0.suspend(print),
            None => print(),
        }
    }

    fn advance(&self, name: &str) {
        if let Some(guard) = &self.progress {
            guard.0.set_message(name.to_string());
            guard.0.inc(1);
        }
    }

    fn folder_display(&self, relocation: &Relocation) -> String {
        display_relative(&self.base_path, &relocation.folder.resolve(&self.base_path))
    }

    fn file_name(relocation: &Relocation) -> String {
        relocation
            .from
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl OrganizeObserver for ConsoleObserver {
    fn on_pass_started(&mut self, _base_path: &Path, file_count: usize) {
        self.progress = Some(ProgressGuard(OutputFormatter::create_progress_bar(
            file_count as u64,
        )));
    }

    fn on_duplicate(&mut self, relocation: &Relocation, _original: &Path) {
        let from = display_relative(&self.base_path, &relocation.from);
        let folder = self.folder_display(relocation);
        let dry_run = self.dry_run;
        self.print(|| OutputFormatter::duplicate_moved(&from, &folder, dry_run));
        self.advance(&Self::file_name(relocation));
    }

    fn on_classified(&mut self, relocation: &Relocation) {
        if self.dry_run {
            let from = display_relative(&self.base_path, &relocation.from);
            let folder = self.folder_display(relocation);
            self.print(|| OutputFormatter::would_move(&from, &folder));
        }
        self.advance(&Self::file_name(relocation));
    }

    fn on_left_in_place(&mut self, entry: &FileEntry) {
        self.advance(entry.name());
    }

    fn on_skipped(&mut self, path: &Path, reason: SkipReason) {
        if reason == SkipReason::Excluded {
            let shown = display_relative(&self.base_path, path);
            self.print(|| OutputFormatter::warning(&format!("Skipping excluded file {}", shown)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["extsort"]).unwrap();

        assert!(cli.directory.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.organize_command(), OrganizeCommand::Organize);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "extsort",
            "/tmp/inbox",
            "--dry-run",
            "--config",
            "extsort.toml",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.directory, Some(PathBuf::from("/tmp/inbox")));
        assert_eq!(cli.config, Some(PathBuf::from("extsort.toml")));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.organize_command(), OrganizeCommand::DryRun);
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["extsort", "--undo"]).is_err());
    }

    #[test]
    fn test_run_cli_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing");

        let result = run_cli(OrganizeCommand::Organize, Some(&missing));
        assert!(result.is_err());
    }

    #[test]
    fn test_run_cli_dry_run_reports_plan() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.txt"), "one").unwrap();
        fs::write(temp_dir.path().join("b.txt"), "one").unwrap();

        let report = run_cli(OrganizeCommand::DryRun, Some(temp_dir.path())).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.tally.count(".txt"), 1);
        assert_eq!(report.duplicates().count(), 1);
        assert!(temp_dir.path().join("a.txt").exists());
        assert!(temp_dir.path().join("b.txt").exists());
    }
}
