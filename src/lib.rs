//! extsort - sort a directory's files into extension folders
//!
//! This library scans the immediate entries of one directory, moves each
//! regular file into a folder named after its lowercased extension, and sends
//! files whose content was already seen during the pass to a `Duplicates`
//! quarantine tree. Content is compared by SHA-256 fingerprint.

pub mod cli;
pub mod config;
pub mod file_entry;
pub mod file_organizer;
pub mod fingerprint;
pub mod logging;
pub mod organizer;
pub mod output;

pub use config::{ConfigError, OrganizerConfig, OrganizerSettings};
pub use file_entry::FileEntry;
pub use file_organizer::{DestinationFolder, OrganizeError, OrganizeResult, Relocation};
pub use fingerprint::{Fingerprint, compute_fingerprint};
pub use organizer::{
    ExtensionTally, FingerprintIndex, NoopObserver, OrganizeObserver, OrganizeReport, Organizer,
};

pub use cli::{OrganizeCommand, run_cli, run_cli_with_config};
