//! txcompare Store - filesystem side of a comparison run
//!
//! - [`ndjson::RecordReader`]: streaming `comparison.ndjson` reader
//! - [`delta_file::FileDeltaSink`]: buffered append-only delta stream
//! - [`atomic::atomic_write`] and [`summary_file`]: all-or-nothing summary
//!   output

#![allow(clippy::result_large_err)]

pub mod atomic;
pub mod delta_file;
pub mod errors;
pub mod ndjson;
pub mod summary_file;

pub use delta_file::FileDeltaSink;
pub use ndjson::RecordReader;
pub use summary_file::{clear_summary, read_summary, write_summary};
