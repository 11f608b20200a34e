//! File-backed delta stream.

use crate::errors::{io_error, stream_io, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use txcompare_core::aggregate::{DeltaEnvelope, DeltaSink};

/// Buffered NDJSON writer for delta envelopes.
///
/// The file is truncated on creation; a run always starts a fresh stream.
pub struct FileDeltaSink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl FileDeltaSink {
    /// Create (or truncate) the delta file, creating parent directories.
    ///
    /// # Errors
    ///
    /// `ERR_IO` when the directory or file cannot be created.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error("create_delta_dir", e))?;
        }
        let file = File::create(path).map_err(|e| io_error("create_delta_file", e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

/// Encode one envelope, then write it as a single line.
///
/// Encoding failures surface as `Serialization`, writer failures as `Io`.
fn write_line<W: Write>(writer: &mut W, delta: &DeltaEnvelope) -> txcompare_core::Result<()> {
    let mut line = serde_json::to_vec(delta)?;
    line.push(b'\n');
    writer
        .write_all(&line)
        .map_err(|e| stream_io("write_delta", e))
}

impl DeltaSink for FileDeltaSink {
    fn write_delta(&mut self, delta: &DeltaEnvelope) -> txcompare_core::Result<()> {
        write_line(&mut self.writer, delta)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> txcompare_core::Result<()> {
        self.writer
            .flush()
            .and_then(|()| self.writer.get_ref().sync_all())
            .map_err(|e| stream_io("flush_deltas", e))?;
        tracing::debug!(
            path = %self.path.display(),
            deltas = self.written,
            "delta stream flushed"
        );
        Ok(())
    }
}
