//! The organize-and-deduplicate pass.
//!
//! One pass scans the immediate entries of a directory, fingerprints every
//! regular file and routes it to exactly one place:
//!
//! 1. `Duplicates/<ext>` if a file with the same content was seen earlier in
//!    the pass,
//! 2. otherwise `<ext>` for files with an extension,
//! 3. otherwise nowhere: extensionless files stay put.
//!
//! The first error aborts the pass. Files moved before it stay moved.

use crate::config::OrganizerSettings;
use crate::file_entry::FileEntry;
use crate::file_organizer::{
    DestinationFolder, FileOrganizer, FolderCache, OrganizeError, OrganizeResult, Relocation,
};
use crate::fingerprint::Fingerprint;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Maps each fingerprint to the first file seen with that content.
///
/// Entries are only ever added, never replaced.
#[derive(Debug, Default)]
pub struct FingerprintIndex {
    first_seen: HashMap<Fingerprint, PathBuf>,
}

impl FingerprintIndex {
    /// Returns the path first recorded for `fingerprint`, if any.
    pub fn first_seen(&self, fingerprint: &Fingerprint) -> Option<&Path> {
        self.first_seen.get(fingerprint).map(PathBuf::as_path)
    }

    /// Records `path` as the first file with `fingerprint`.
    ///
    /// Returns `false` and keeps the existing entry if the fingerprint is known.
    pub fn record(&mut self, fingerprint: Fingerprint, path: PathBuf) -> bool {
        match self.first_seen.entry(fingerprint) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(path);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}

/// Number of files classified per extension, duplicates excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionTally {
    counts: BTreeMap<String, usize>,
}

impl ExtensionTally {
    /// Counts one more file for `extension` (lowercase, with dot).
    pub fn record(&mut self, extension: &str) {
        *self.counts.entry(extension.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, extension: &str) -> usize {
        self.counts.get(extension).copied().unwrap_or(0)
    }

    /// Extensions with a positive count, sorted by extension.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(extension, &count)| (extension.as_str(), count))
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Why an entry of the target directory was not considered at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A directory, a link to one, a broken link or a special file.
    NotRegularFile,
    /// Dropped by the configured filters.
    Excluded,
}

/// Receives each decision of a pass as it is made.
///
/// All methods default to doing nothing.
pub trait OrganizeObserver {
    /// Called once the directory has been listed, before any file is hashed.
    fn on_pass_started(&mut self, _base_path: &Path, _file_count: usize) {}

    /// A file whose content was already seen went to quarantine.
    fn on_duplicate(&mut self, _relocation: &Relocation, _original: &Path) {}

    /// A file went to its extension folder.
    fn on_classified(&mut self, _relocation: &Relocation) {}

    /// An extensionless file was left where it is.
    fn on_left_in_place(&mut self, _entry: &FileEntry) {}

    /// An entry was not considered.
    fn on_skipped(&mut self, _path: &Path, _reason: SkipReason) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl OrganizeObserver for NoopObserver {}

/// Outcome of a completed pass.
#[derive(Debug, Clone)]
pub struct OrganizeReport {
    /// The absolute directory that was organized.
    pub base_path: PathBuf,
    /// Whether moves were only planned.
    pub dry_run: bool,
    /// Classified files per extension.
    pub tally: ExtensionTally,
    /// Every move, in processing order.
    pub relocations: Vec<Relocation>,
    /// Extensionless files that were not moved.
    pub left_in_place: Vec<PathBuf>,
    /// Entries that were not considered.
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

impl OrganizeReport {
    fn new(base_path: PathBuf, dry_run: bool) -> Self {
        Self {
            base_path,
            dry_run,
            tally: ExtensionTally::default(),
            relocations: Vec::new(),
            left_in_place: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Moves into the quarantine tree.
    pub fn duplicates(&self) -> impl Iterator<Item = &Relocation> {
        self.relocations.iter().filter(|r| r.is_duplicate())
    }

    /// Moves into extension folders.
    pub fn classified(&self) -> impl Iterator<Item = &Relocation> {
        self.relocations.iter().filter(|r| !r.is_duplicate())
    }
}

/// Resolves the directory to organize to an absolute path.
///
/// `None` or an empty path means the directory holding the running executable.
pub fn resolve_target(target: Option<&Path>) -> OrganizeResult<PathBuf> {
    let requested = match target {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => executable_dir()?,
    };

    let resolved =
        fs::canonicalize(&requested).map_err(|e| OrganizeError::InvalidBasePath {
            path: requested.clone(),
            source: e,
        })?;

    if !resolved.is_dir() {
        return Err(OrganizeError::InvalidBasePath {
            path: requested,
            source: std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                "target is not a directory",
            ),
        });
    }

    Ok(resolved)
}

fn executable_dir() -> OrganizeResult<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| OrganizeError::ExecutableLocationUnavailable { source: e })?;

    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| OrganizeError::ExecutableLocationUnavailable {
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "executable path has no parent directory",
            ),
        })
}

/// Runs organize passes over one directory.
///
/// # Examples
///
/// ```no_run
/// use extsort::organizer::{NoopObserver, Organizer};
/// use std::path::Path;
///
/// let organizer = Organizer::new(Some(Path::new("/home/user/Downloads"))).unwrap();
/// let report = organizer.run(&mut NoopObserver).unwrap();
/// for (extension, count) in report.tally.iter() {
///     println!("{} {} file(s)", count, extension);
/// }
/// ```
#[derive(Debug)]
pub struct Organizer {
    base_path: PathBuf,
    settings: OrganizerSettings,
    dry_run: bool,
}

impl Organizer {
    /// Creates an organizer with default settings for `target`.
    pub fn new(target: Option<&Path>) -> OrganizeResult<Self> {
        Self::with_settings(target, OrganizerSettings::default())
    }

    pub fn with_settings(target: Option<&Path>, settings: OrganizerSettings) -> OrganizeResult<Self> {
        Ok(Self {
            base_path: resolve_target(target)?,
            settings,
            dry_run: false,
        })
    }

    /// Only plan moves: nothing is created or moved on disk.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// The quarantine root under the base directory.
    pub fn duplicates_path(&self) -> PathBuf {
        self.base_path.join(&self.settings.duplicates_dir)
    }

    /// Runs one pass, reporting each decision to `observer`.
    ///
    /// # Errors
    ///
    /// Returns the first I/O failure met while listing, hashing, creating a
    /// folder or moving a file. Work done before the failure is kept.
    pub fn run(&self, observer: &mut dyn OrganizeObserver) -> OrganizeResult<OrganizeReport> {
        info!(
            base = %self.base_path.display(),
            dry_run = self.dry_run,
            "starting organize pass"
        );

        let mut folders = FolderCache::default();
        if !self.dry_run {
            folders.ensure(&self.duplicates_path())?;
        }

        let mut report = OrganizeReport::new(self.base_path.clone(), self.dry_run);
        let entries = self.scan(&mut report, observer)?;
        observer.on_pass_started(&self.base_path, entries.len());

        let mut index = FingerprintIndex::default();

        for entry in &entries {
            let fingerprint = entry
                .fingerprint()
                .map_err(|e| OrganizeError::FingerprintFailed {
                    path: entry.path().to_path_buf(),
                    source: e,
                })?
                .clone();

            if let Some(original) = index.first_seen(&fingerprint) {
                let original = original.to_path_buf();
                let folder =
                    DestinationFolder::quarantine(&self.settings.duplicates_dir, entry.folder_name());
                let relocation = self.relocate(entry, folder, &mut folders)?;

                debug!(
                    file = %entry.name(),
                    original = %original.display(),
                    %fingerprint,
                    "duplicate"
                );
                observer.on_duplicate(&relocation, &original);
                report.relocations.push(relocation);
                continue;
            }

            index.record(fingerprint, entry.path().to_path_buf());

            if !entry.is_classifiable() {
                debug!(file = %entry.name(), "no extension, left in place");
                observer.on_left_in_place(entry);
                report.left_in_place.push(entry.path().to_path_buf());
                continue;
            }

            report.tally.record(entry.extension());
            let folder = DestinationFolder::classification(entry.folder_name());
            let relocation = self.relocate(entry, folder, &mut folders)?;

            debug!(file = %entry.name(), folder = %relocation.folder.name(), "classified");
            observer.on_classified(&relocation);
            report.relocations.push(relocation);
        }

        info!(
            moved = report.relocations.len(),
            distinct = index.len(),
            "organize pass finished"
        );

        Ok(report)
    }

    /// Lists the regular files of the base directory, sorted by name.
    fn scan(
        &self,
        report: &mut OrganizeReport,
        observer: &mut dyn OrganizeObserver,
    ) -> OrganizeResult<Vec<FileEntry>> {
        let read_error = |e| OrganizeError::DirectoryReadFailed {
            path: self.base_path.clone(),
            source: e,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.base_path).map_err(read_error)? {
            paths.push(entry.map_err(read_error)?.path());
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            // Follows links: a link to a regular file counts as one
            let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
            let entry = if is_file { FileEntry::new(path.clone()) } else { None };

            let Some(entry) = entry else {
                observer.on_skipped(&path, SkipReason::NotRegularFile);
                report.skipped.push((path, SkipReason::NotRegularFile));
                continue;
            };

            if !self.settings.filters.should_include(entry.name()) {
                debug!(file = %entry.name(), "excluded by filters");
                observer.on_skipped(&path, SkipReason::Excluded);
                report.skipped.push((path, SkipReason::Excluded));
                continue;
            }

            entries.push(entry);
        }

        Ok(entries)
    }

    fn relocate(
        &self,
        entry: &FileEntry,
        folder: DestinationFolder,
        folders: &mut FolderCache,
    ) -> OrganizeResult<Relocation> {
        if self.dry_run {
            return FileOrganizer::plan(&self.base_path, entry.path(), folder);
        }

        folders.ensure(&folder.resolve(&self.base_path))?;
        FileOrganizer::relocate(&self.base_path, entry.path(), folder)
    }
}
