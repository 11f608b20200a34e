//! Atomic write primitives
//!
//! Content goes to a sibling `.tmp` file which is synced and then renamed
//! over the target, so readers see either the old file or the complete new
//! one.

use crate::errors::{io_error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Atomically replace `target_path` with `content`, creating parent
/// directories as needed.
///
/// # Errors
///
/// `ERR_IO` naming the step that failed. On failure the target is left
/// untouched and the temp file is removed on a best-effort basis.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_output_dir", e))?;
    }

    let temp_path = target_path.with_extension("tmp");
    let written = File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(content)?;
            file.sync_all()
        })
        .map_err(|e| io_error("write_temp", e))
        .and_then(|()| {
            fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_temp", e))
        });

    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}
