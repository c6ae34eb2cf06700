/* Commit generated text to `<base>.h` and `<base>.c` */

use super::c::GeneratedArtifacts;
use crate::error::GenError;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, warn};

/// Header and source paths for an output basename. The suffix is appended,
/// so `out/v1.2` yields `out/v1.2.h`.
pub fn artifact_paths(base: &Path) -> (PathBuf, PathBuf) {
    (with_suffix(base, ".h"), with_suffix(base, ".c"))
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Stage both files next to their destination, then persist them. An
/// existing header is moved aside first and put back if the source cannot be
/// committed, so a failed run leaves the previous pair in place.
pub fn write_artifacts(base: &Path, artifacts: &GeneratedArtifacts) -> Result<(PathBuf, PathBuf), GenError> {
    let (header_path, source_path) = artifact_paths(base);

    let dir = match header_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|source| GenError::ArtifactWrite { path: dir.clone(), source })?;

    let header = stage(&dir, &header_path, &artifacts.header)?;
    let source = stage(&dir, &source_path, &artifacts.source)?;
    let previous_header = move_aside(&dir, &header_path)?;

    if let Err(e) = header.persist(&header_path) {
        if let Some(previous) = previous_header {
            restore(previous, &header_path);
        }
        return Err(GenError::ArtifactWrite { path: header_path, source: e.error });
    }

    if let Err(e) = source.persist(&source_path) {
        match previous_header {
            Some(previous) => restore(previous, &header_path),
            None => {
                if let Err(err) = fs::remove_file(&header_path) {
                    warn!(path = %header_path.display(), error = %err, "failed to remove uncommitted header");
                }
            }
        }
        return Err(GenError::ArtifactWrite { path: source_path, source: e.error });
    }

    debug!(header = %header_path.display(), source = %source_path.display(), "artifacts written");
    Ok((header_path, source_path))
}

/* Rename an existing regular file onto a temp path in `dir`; dropping the path deletes it */
fn move_aside(dir: &Path, destination: &Path) -> Result<Option<TempPath>, GenError> {
    match fs::symlink_metadata(destination) {
        Ok(meta) if meta.is_file() => {}
        _ => return Ok(None),
    }
    let wrap = |source: std::io::Error| GenError::ArtifactWrite { path: destination.to_path_buf(), source };
    let backup = NamedTempFile::new_in(dir).map_err(wrap)?.into_temp_path();
    fs::rename(destination, &backup).map_err(wrap)?;
    Ok(Some(backup))
}

fn restore(previous: TempPath, destination: &Path) {
    if let Err(e) = previous.persist(destination) {
        warn!(
            path = %destination.display(),
            backup = %e.path.display(),
            error = %e.error,
            "failed to restore previous artifact"
        );
        /* Keep the backup on disk so the previous file is not lost */
        if let Err(keep) = e.path.keep() {
            warn!(error = %keep.error, "failed to keep artifact backup");
        }
    }
}

fn stage(dir: &Path, destination: &Path, text: &str) -> Result<NamedTempFile, GenError> {
    let wrap = |source: std::io::Error| GenError::ArtifactWrite { path: destination.to_path_buf(), source };
    let mut file = NamedTempFile::new_in(dir).map_err(wrap)?;
    file.write_all(text.as_bytes()).map_err(wrap)?;
    file.flush().map_err(wrap)?;
    Ok(file)
}
