//! Job directory layout.

use std::path::{Path, PathBuf};
use txcompare_store::errors::{missing_job_file, Result};

pub const INPUT_FILE: &str = "comparison.ndjson";
pub const RULES_FILE: &str = "tolerances.toml";
pub const RESULTS_DIR: &str = "results";

/// Well-known paths inside a job directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLayout {
    root: PathBuf,
}

impl JobLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn input(&self) -> PathBuf {
        self.root.join(INPUT_FILE)
    }

    pub fn rules(&self) -> PathBuf {
        self.root.join(RULES_FILE)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join(RESULTS_DIR)
    }

    pub fn deltas(&self) -> PathBuf {
        self.results_dir().join("deltas").join("deltas.ndjson")
    }

    pub fn summary(&self) -> PathBuf {
        self.results_dir().join("summary.json")
    }

    /// Fail unless `path` exists as a regular file.
    ///
    /// # Errors
    ///
    /// `ERR_NOT_FOUND` naming the missing path.
    pub fn require_file(path: &Path) -> Result<()> {
        if path.is_file() {
            Ok(())
        } else {
            Err(missing_job_file(path))
        }
    }
}
