use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{map_write_err, TextSwapError, TextSwapResult};

/// Suffix appended to the file name when `--backup` is requested
pub const BACKUP_SUFFIX: &str = ".bak";

/// Read a file fully and decode it as UTF-8, with no fallback encoding
pub fn read_utf8(path: impl AsRef<Path>) -> TextSwapResult<String> {
    let path = path.as_ref();
    debug!("Reading file: {}", path.display());

    let bytes = fs::read(path).map_err(|e| TextSwapError::not_found(e, path))?;

    String::from_utf8(bytes)
        .map_err(|e| TextSwapError::decode_error(path, e.utf8_error().valid_up_to()))
}

/// Write content to a file through a temp file in the same directory and an atomic rename.
///
/// The original file stays intact until the rename succeeds. Permissions of an
/// existing target are carried over to the replacement. Symlinks are resolved
/// first so the link keeps pointing at the updated file.
pub fn atomic_write(path: impl AsRef<Path>, content: &str) -> TextSwapResult<()> {
    // Follow symlinks so the rename replaces the real document, not the link
    let resolved =
        fs::canonicalize(path.as_ref()).unwrap_or_else(|_| path.as_ref().to_path_buf());
    let path = resolved.as_path();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    debug!("Writing {} via temp file in {}", path.display(), parent.display());

    let mut temp = NamedTempFile::new_in(&parent).map_err(map_write_err(path))?;
    temp.write_all(content.as_bytes())
        .map_err(map_write_err(path))?;
    temp.flush().map_err(map_write_err(path))?;
    temp.as_file().sync_all().map_err(map_write_err(path))?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions()).map_err(map_write_err(path))?;
    }

    temp.persist(path)
        .map_err(|e| TextSwapError::write_error(e.error.to_string(), path))?;

    // Verify nothing else touched the file between rename and now
    let hash_after = file_hash(path).map_err(map_write_err(path))?;
    if hash_after != string_hash(content) {
        warn!(
            "File hash after write doesn't match expected: {}",
            path.display()
        );
        return Err(TextSwapError::write_error(
            "file may have been modified concurrently during write",
            path,
        ));
    }

    Ok(())
}

/// Copy the current file to `<file>.bak`, returning the backup path
pub fn backup_file(path: impl AsRef<Path>) -> TextSwapResult<PathBuf> {
    let path = path.as_ref();
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    let backup_path = PathBuf::from(name);

    fs::copy(path, &backup_path).map_err(map_write_err(&backup_path))?;
    debug!("Backed up {} to {}", path.display(), backup_path.display());

    Ok(backup_path)
}

/// Calculate a SHA-256 hash for file content
pub fn file_hash(path: impl AsRef<Path>) -> std::io::Result<String> {
    let content = fs::read(path.as_ref())?;

    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Calculate a SHA-256 hash for a string
pub fn string_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
