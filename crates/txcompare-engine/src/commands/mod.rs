//! Command orchestration layer.
//!
//! Each command owns its `log_op_*` boundary; store and core below log
//! only at `debug`/`info` for internal details.

#![allow(clippy::result_large_err)]

pub mod compare;
pub mod job;
pub mod report;
pub mod rules;
