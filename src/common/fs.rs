//! Filesystem utility functions
//!
//! This module provides the small set of filesystem primitives the renderer needs:
//! existence checks, mode-aware writes, removal, and extension-filtered directory
//! listing for stale-file eviction.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{AppError, Result};

/// Check if a file exists and is a regular file.
pub fn check_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file does not exist: {}", path.display()),
        )));
    }

    if !path.is_file() {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("path is not a file: {}", path.display()),
        )));
    }

    Ok(())
}

/// Read file content as bytes.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    check_file_exists(path)?;
    fs::read(path).map_err(AppError::Io)
}

/// Write `contents` to `path`, creating or truncating it, with the given Unix mode bits
/// (e.g. `0o644`, `0o600`). The write is not atomic; callers that need crash-safety across
/// a whole directory (certs, config) rely on the reconciler's partial-failure policy instead
/// of per-file renames.
pub fn write_file_with_mode(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, contents)?;
    let perms = fs::Permissions::from_mode(mode);
    fs::set_permissions(path, perms)?;
    Ok(())
}

/// Remove `path` if it exists; a missing file is not an error.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::Io(e)),
    }
}

/// List the immediate children of `dir` whose file name ends with `extension`
/// (e.g. `"crt"`). Returns an empty vector if `dir` does not exist.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches)
}
