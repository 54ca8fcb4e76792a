//! Atomic asset writer.
//!
//! 1. Create the parent directory.
//! 2. Write to `<path>.relay.tmp`.
//! 3. Rename to the final path (atomic on POSIX).
//!
//! A failed rename removes the temp file and leaves any original intact.
//! Content is written byte-for-byte; callers decide whether a write happens.

use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<(), SyncError> {
    let tmp = PathBuf::from(format!("{}.relay.tmp", path.display()));
    write_atomic_with_tmp(path, content, &tmp)
}

fn write_atomic_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    tracing::info!("wrote: {}", path.display());
    Ok(())
}
