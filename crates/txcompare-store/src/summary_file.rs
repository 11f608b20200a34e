//! `summary.json` persistence.

use crate::atomic::atomic_write;
use crate::errors::{io_error, missing_job_file, serialization_error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use txcompare_core::model::Summary;

/// Write the summary as pretty-printed JSON, all or nothing.
///
/// # Errors
///
/// `ERR_SERIALIZATION` if encoding fails, `ERR_IO` if the write fails. No
/// partial file is left behind either way.
pub fn write_summary(path: &Path, summary: &Summary) -> Result<()> {
    let mut body =
        serde_json::to_vec_pretty(summary).map_err(|e| serialization_error("encode_summary", e))?;
    body.push(b'\n');
    atomic_write(path, &body)
}

/// Remove a summary left by an earlier run. Absent is fine.
///
/// # Errors
///
/// `ERR_IO` if the file exists but cannot be removed.
pub fn clear_summary(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error("clear_summary", e)),
    }
}

/// Load a previously written summary.
///
/// # Errors
///
/// `ERR_NOT_FOUND` if absent, `ERR_IO` or `ERR_SERIALIZATION` otherwise.
pub fn read_summary(path: &Path) -> Result<Summary> {
    let text = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => missing_job_file(path),
        _ => io_error("read_summary", e),
    })?;
    serde_json::from_slice(&text).map_err(|e| serialization_error("decode_summary", e))
}
