//! # Filesystem Certificate Store
//!
//! Owns the on-disk lifecycle of certificate artifacts for the duration of
//! a pipeline run: directory creation, best-effort removal of prior-run
//! material, and reads for the secret synchronizer.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::errors::{Error, Result};

/// Outcome of a best-effort delete.
///
/// A fresh service has no prior artifacts, so absence is an expected,
/// common case and is reported as a value rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed,
    Absent,
}

/// Create the directory tree if absent. Succeeds silently when the
/// directory already exists.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() {
        debug!(directory = %path.display(), "Directory already exists");
        return Ok(());
    }
    fs::create_dir_all(path)
        .map_err(|e| Error::io(e, format!("creating directory {}", path.display())))?;
    info!(directory = %path.display(), "Created certificate directory");
    Ok(())
}

/// Delete a file if it exists. Absence is not an error; any other I/O
/// failure propagates.
pub fn try_remove(path: &Path) -> Result<RemovalOutcome> {
    match fs::remove_file(path) {
        Ok(()) => Ok(RemovalOutcome::Removed),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(RemovalOutcome::Absent),
        Err(e) => Err(Error::io(e, format!("removing {}", path.display()))),
    }
}

/// Remove each named artifact from the directory, best-effort. Missing
/// files are logged and skipped.
pub fn remove_artifacts(directory: &Path, filenames: &[&str]) -> Result<()> {
    for filename in filenames {
        let path = directory.join(filename);
        match try_remove(&path)? {
            RemovalOutcome::Removed => info!(artifact = %path.display(), "Artifact removed"),
            RemovalOutcome::Absent => debug!(artifact = %path.display(), "Artifact not found"),
        }
    }
    Ok(())
}

/// Read an artifact's content. Absence here indicates a genuine pipeline
/// defect, so it is a hard [`Error::ArtifactNotFound`].
pub fn read_artifact(directory: &Path, filename: &str) -> Result<Vec<u8>> {
    let path = directory.join(filename);
    match fs::read(&path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::ArtifactNotFound { path })
        }
        Err(e) => Err(Error::io(e, format!("reading {}", path.display()))),
    }
}

/// Check that every named file exists under the directory, returning the
/// first missing path as [`Error::ArtifactNotFound`].
pub fn require_artifacts(directory: &Path, filenames: &[&str]) -> Result<()> {
    for filename in filenames {
        let path = directory.join(filename);
        if !path.exists() {
            return Err(Error::ArtifactNotFound { path });
        }
    }
    Ok(())
}
