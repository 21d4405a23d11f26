//! Low-level file utilities

use std::fs;
use std::io::Write;
use std::path::Path;

use log::trace;
use tempfile::NamedTempFile;

use super::types::error::{GfError, Result};

/// Replace `path` with `contents` atomically.
///
/// The data goes to a temporary file in the destination directory, is synced,
/// then renamed over the target. Missing parent directories are created. A
/// crash leaves either the old file or the new one, never a partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    trace!("Wrote {} bytes to {}", contents.len(), temp.path().display());

    temp.persist(path).map_err(|e| GfError::Persist {
        path: path.display().to_string(),
        source: e.error,
    })?;
    Ok(())
}
