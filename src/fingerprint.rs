//! Content fingerprints used to spot byte-identical files.
//!
//! A fingerprint is the SHA-256 digest of a file's complete contents, rendered
//! as lowercase hex. Files are streamed in fixed-size chunks so memory use does
//! not depend on file size.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of bytes read from disk per hashing step.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Hex-encoded SHA-256 digest of a file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Returns the digest as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the fingerprint of the file at `path`.
///
/// The whole file is read, never a sample. Errors opening or reading the file
/// are returned as-is; the caller decides whether they are fatal.
///
/// # Examples
///
/// ```no_run
/// use extsort::fingerprint::compute_fingerprint;
/// use std::path::Path;
///
/// let fingerprint = compute_fingerprint(Path::new("photo.jpg")).unwrap();
/// println!("{}", fingerprint);
/// ```
pub fn compute_fingerprint(path: &Path) -> io::Result<Fingerprint> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Fingerprint(format!("{:x}", hasher.finalize())))
}
