//! Artifact writer
//!
//! Each artifact is written whole: contents go to a temporary file in the
//! target directory, which is then renamed over the destination. A rerun
//! replaces earlier output instead of appending to it.

use std::io::Write;
use std::path::Path;

use crate::EmitError;

/// Replace `path` with `contents`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`EmitError::Write`] if any filesystem step fails.
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), EmitError> {
    let write_err = |e: std::io::Error| EmitError::Write(path.to_path_buf(), e.to_string());

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/a.js");
        write_artifact(&path, "one").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one");
    }

    #[test]
    fn rerun_replaces_instead_of_appending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("op.contract.spec.ts");
        write_artifact(&path, "first run\n").unwrap();
        write_artifact(&path, "second run\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second run\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn unwritable_target_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let err = write_artifact(&blocker.join("child.js"), "y").unwrap_err();
        assert!(matches!(err, EmitError::Write(..)));
    }
}
