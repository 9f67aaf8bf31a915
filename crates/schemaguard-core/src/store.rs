//! Snapshot file access.
//!
//! Writes go through a temp file in the target directory followed by a
//! rename, so readers only ever see a complete snapshot. Concurrent writers
//! to the same path are not coordinated; the last rename wins.

use crate::error::GuardError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads the snapshot at `path`.
///
/// # Errors
///
/// [`GuardError::MissingSnapshot`] if the file does not exist,
/// [`GuardError::Io`] for every other failure.
pub fn read_snapshot(path: &Path) -> Result<String, GuardError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => GuardError::MissingSnapshot {
            path: path.to_path_buf(),
        },
        _ => GuardError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Atomically replaces the snapshot at `path` with `content`.
///
/// Creates the parent directory when it does not exist.
pub fn write_snapshot(path: &Path, content: &str) -> Result<(), GuardError> {
    let io_error = |path: &Path, source: std::io::Error| GuardError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, content).map_err(|e| io_error(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        io_error(path, e)
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
