/// Filesystem side of organization: destination folders and file moves.
///
/// Every path handled here is joined onto an explicit base directory; nothing
/// in this module reads or changes the process working directory.
use crate::config::ConfigError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A folder a file can be routed to, relative to the organized directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DestinationFolder {
    /// `<base>/<name>`, holding the first-seen copy of each content.
    Classification { name: String },
    /// `<base>/<root>/<name>`, holding content already seen in this pass.
    Quarantine { root: String, name: String },
}

impl DestinationFolder {
    pub fn classification(name: &str) -> Self {
        Self::Classification {
            name: name.to_string(),
        }
    }

    pub fn quarantine(root: &str, name: &str) -> Self {
        Self::Quarantine {
            root: root.to_string(),
            name: name.to_string(),
        }
    }

    /// The extension-derived folder name, without the quarantine root.
    pub fn name(&self) -> &str {
        match self {
            Self::Classification { name } | Self::Quarantine { name, .. } => name,
        }
    }

    pub fn is_quarantine(&self) -> bool {
        matches!(self, Self::Quarantine { .. })
    }

    /// The folder path relative to the organized directory.
    ///
    /// An empty quarantine name resolves to the quarantine root itself.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            Self::Classification { name } => PathBuf::from(name),
            Self::Quarantine { root, name } if name.is_empty() => PathBuf::from(root),
            Self::Quarantine { root, name } => Path::new(root).join(name),
        }
    }

    /// The absolute folder path under `base_path`.
    pub fn resolve(&self, base_path: &Path) -> PathBuf {
        base_path.join(self.relative_path())
    }
}

/// A single file move, performed or planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// Where the file was found.
    pub from: PathBuf,
    /// Where the file ends up.
    pub to: PathBuf,
    /// The folder the file was routed to.
    pub folder: DestinationFolder,
}

impl Relocation {
    pub fn is_duplicate(&self) -> bool {
        self.folder.is_quarantine()
    }
}

/// Errors that abort an organization pass.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target directory does not exist or is not a directory.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// No target was given and the running executable's directory is unknown.
    ExecutableLocationUnavailable { source: std::io::Error },
    /// Listing the target directory failed.
    DirectoryReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a destination folder.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read a file while fingerprinting it.
    FingerprintFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file into its destination folder.
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    /// The configuration could not be loaded.
    Config(ConfigError),
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::ExecutableLocationUnavailable { source } => {
                write!(f, "Could not locate the running executable: {}", source)
            }
            Self::DirectoryReadFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FingerprintFailed { path, source } => {
                write!(f, "Failed to hash {}: {}", path.display(), source)
            }
            Self::FileMoveFailure { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            Self::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidBasePath { source, .. }
            | Self::ExecutableLocationUnavailable { source }
            | Self::DirectoryReadFailed { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::FingerprintFailed { source, .. }
            | Self::FileMoveFailure { source, .. } => Some(source),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for OrganizeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Creates destination folders lazily, at most once per distinct path.
#[derive(Debug, Default)]
pub struct FolderCache {
    ensured: HashSet<PathBuf>,
}

impl FolderCache {
    /// Makes sure `folder` exists, creating it (and missing parents) if needed.
    ///
    /// Returns `true` if this call created the folder.
    pub fn ensure(&mut self, folder: &Path) -> OrganizeResult<bool> {
        if self.ensured.contains(folder) {
            return Ok(false);
        }

        let created = if folder.is_dir() {
            false
        } else {
            fs::create_dir_all(folder).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: folder.to_path_buf(),
                source: e,
            })?;
            tracing::debug!(folder = %folder.display(), "created folder");
            true
        };

        self.ensured.insert(folder.to_path_buf());
        Ok(created)
    }

    /// Whether `folder` has already been ensured during this pass.
    pub fn contains(&self, folder: &Path) -> bool {
        self.ensured.contains(folder)
    }
}

/// Moves files into destination folders.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Returns where `file_path` would land inside `folder_path`.
    pub fn destination_for(file_path: &Path, folder_path: &Path) -> OrganizeResult<PathBuf> {
        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                from: file_path.to_path_buf(),
                to: folder_path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        Ok(folder_path.join(file_name))
    }

    /// Moves `file_path` into `folder` under `base_path` and records the move.
    ///
    /// The folder must already exist; see [`FolderCache::ensure`]. A file of the
    /// same name already in the folder is replaced, as a plain rename would.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use extsort::file_organizer::{DestinationFolder, FileOrganizer};
    /// use std::path::Path;
    ///
    /// let relocation = FileOrganizer::relocate(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/image.png"),
    ///     DestinationFolder::classification("png"),
    /// );
    ///
    /// match relocation {
    ///     Ok(r) => println!("Moved {} to {}", r.from.display(), r.to.display()),
    ///     Err(e) => eprintln!("Move failed: {}", e),
    /// }
    /// ```
    pub fn relocate(
        base_path: &Path,
        file_path: &Path,
        folder: DestinationFolder,
    ) -> OrganizeResult<Relocation> {
        let folder_path = folder.resolve(base_path);
        let destination_path = Self::destination_for(file_path, &folder_path)?;

        fs::rename(file_path, &destination_path).map_err(|e| OrganizeError::FileMoveFailure {
            from: file_path.to_path_buf(),
            to: destination_path.clone(),
            source: e,
        })?;

        Ok(Relocation {
            from: file_path.to_path_buf(),
            to: destination_path,
            folder,
        })
    }

    /// Describes the move [`relocate`](Self::relocate) would perform, without touching disk.
    pub fn plan(
        base_path: &Path,
        file_path: &Path,
        folder: DestinationFolder,
    ) -> OrganizeResult<Relocation> {
        let folder_path = folder.resolve(base_path);
        let destination_path = Self::destination_for(file_path, &folder_path)?;

        Ok(Relocation {
            from: file_path.to_path_buf(),
            to: destination_path,
            folder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_destination_folder_paths() {
        let base = Path::new("/base");

        let png = DestinationFolder::classification("png");
        assert_eq!(png.resolve(base), base.join("png"));
        assert!(!png.is_quarantine());

        let dup = DestinationFolder::quarantine("Duplicates", "jpg");
        assert_eq!(dup.resolve(base), base.join("Duplicates").join("jpg"));
        assert_eq!(dup.name(), "jpg");
        assert!(dup.is_quarantine());

        let bare = DestinationFolder::quarantine("Duplicates", "");
        assert_eq!(bare.resolve(base), base.join("Duplicates"));
    }

    #[test]
    fn test_folder_cache_creates_once() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path().join("Duplicates").join("txt");
        let mut cache = FolderCache::default();

        assert!(cache.ensure(&folder).expect("Failed to ensure folder"));
        assert!(folder.is_dir());
        assert!(cache.contains(&folder));
        assert!(!cache.ensure(&folder).expect("Failed to ensure folder"));
    }

    #[test]
    fn test_folder_cache_existing_directory_is_not_created() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path().join("png");
        fs::create_dir(&folder).expect("Failed to create folder");

        let mut cache = FolderCache::default();
        assert!(!cache.ensure(&folder).expect("Failed to ensure folder"));
    }

    #[test]
    fn test_folder_cache_blocked_by_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp_dir.path().join("txt");
        fs::write(&blocker, "not a folder").expect("Failed to write blocker");

        let mut cache = FolderCache::default();
        let result = cache.ensure(&blocker);
        assert!(matches!(
            result,
            Err(OrganizeError::DirectoryCreationFailed { .. })
        ));
    }

    #[test]
    fn test_relocate_moves_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");
        fs::create_dir(base_path.join("txt")).expect("Failed to create folder");

        let relocation =
            FileOrganizer::relocate(base_path, &file_path, DestinationFolder::classification("txt"))
                .expect("Failed to move file");

        assert!(!file_path.exists());
        assert_eq!(relocation.to, base_path.join("txt").join("test.txt"));
        assert!(relocation.to.exists());
        assert!(!relocation.is_duplicate());
    }

    #[test]
    fn test_relocate_into_missing_folder_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let result =
            FileOrganizer::relocate(base_path, &file_path, DestinationFolder::classification("txt"));

        assert!(matches!(result, Err(OrganizeError::FileMoveFailure { .. })));
        assert!(file_path.exists());
    }

    #[test]
    fn test_plan_leaves_file_in_place() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let file_path = base_path.join("b.jpg");
        fs::write(&file_path, "x").expect("Failed to write test file");

        let relocation = FileOrganizer::plan(
            base_path,
            &file_path,
            DestinationFolder::quarantine("Duplicates", "jpg"),
        )
        .expect("Failed to plan move");

        assert!(file_path.exists());
        assert!(!base_path.join("Duplicates").exists());
        assert_eq!(
            relocation.to,
            base_path.join("Duplicates").join("jpg").join("b.jpg")
        );
        assert!(relocation.is_duplicate());
    }
}
