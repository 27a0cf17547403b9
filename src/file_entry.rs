//! Directory entries eligible for organization and their extension rules.
//!
//! Extensions are taken from the last `.` of the file name, ignoring any dots
//! the name starts with, and are compared lowercased.
//!
//! # Examples
//!
//! ```
//! use extsort::file_entry::{folder_name, normalized_extension};
//!
//! assert_eq!(normalized_extension("Holiday.JPG"), ".jpg");
//! assert_eq!(normalized_extension("archive.tar.gz"), ".gz");
//! assert_eq!(normalized_extension(".bashrc"), "");
//! assert_eq!(folder_name(".jpg"), "jpg");
//! ```

use crate::fingerprint::{Fingerprint, compute_fingerprint};
use std::cell::OnceCell;
use std::io;
use std::path::{Path, PathBuf};

/// Returns the extension of `name` including its leading dot, in original case.
///
/// Leading dots of the name do not start an extension, so `.profile` has none
/// and `..a` has none, while `name.` has the bare extension `"."`.
pub fn split_extension(name: &str) -> &str {
    let Some(dot) = name.rfind('.') else {
        return "";
    };

    if name[..dot].bytes().all(|b| b == b'.') {
        ""
    } else {
        &name[dot..]
    }
}

/// Returns the lowercased extension of `name`, including the leading dot.
pub fn normalized_extension(name: &str) -> String {
    split_extension(name).to_lowercase()
}

/// Returns the folder name for an extension: the extension without leading dots.
///
/// The bare extension `"."` and the empty extension both map to `""`.
pub fn folder_name(extension: &str) -> &str {
    extension.trim_start_matches('.')
}

/// Whether files with this extension get a classification folder.
///
/// Empty and bare-dot extensions are left where they are.
pub fn is_classifiable(extension: &str) -> bool {
    !extension.is_empty() && extension != "."
}

/// A regular file found directly inside the directory being organized.
#[derive(Debug)]
pub struct FileEntry {
    name: String,
    path: PathBuf,
    extension: String,
    fingerprint: OnceCell<Fingerprint>,
}

impl FileEntry {
    /// Creates an entry for the file at `path`.
    ///
    /// Returns `None` when the path has no file name component.
    pub fn new(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().into_owned();
        let extension = normalized_extension(&name);

        Some(Self {
            name,
            path,
            extension,
            fingerprint: OnceCell::new(),
        })
    }

    /// The file name, lossily converted for display and extension parsing.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full path of the file at scan time.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The lowercased extension including its dot, or `""`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The folder this file's extension maps to.
    pub fn folder_name(&self) -> &str {
        folder_name(&self.extension)
    }

    pub fn is_classifiable(&self) -> bool {
        is_classifiable(&self.extension)
    }

    /// Returns the content fingerprint, hashing the file on first call only.
    pub fn fingerprint(&self) -> io::Result<&Fingerprint> {
        if let Some(fingerprint) = self.fingerprint.get() {
            return Ok(fingerprint);
        }

        let fingerprint = compute_fingerprint(&self.path)?;
        Ok(self.fingerprint.get_or_init(|| fingerprint))
    }
}
