//! Timestamp-based staleness checks.
//!
//! An artifact is stale when it is missing or when its source was modified
//! strictly later than it. Nothing but modification times is consulted, so an
//! artifact truncated by an interrupted compile counts as fresh until its
//! source changes again.

use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use std::time::SystemTime;

use crate::error::BuildError;

/// Returns `true` if `artifact` is missing or older than `source`.
///
/// The artifact is examined first: a missing artifact is stale without
/// looking at the source. Otherwise a missing source is an error.
pub fn is_stale(source: &Path, artifact: &Path) -> Result<bool, BuildError> {
    let artifact_time = match modified(artifact) {
        Ok(time) => time,
        Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(true),
        Err(e) => {
            return Err(BuildError::Io {
                path: artifact.to_path_buf(),
                source: e,
            })
        }
    };

    let source_time = modified(source).map_err(|e| BuildError::MissingSource {
        path: source.to_path_buf(),
        source: e,
    })?;

    Ok(source_time > artifact_time)
}

fn modified(path: &Path) -> std::io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}
