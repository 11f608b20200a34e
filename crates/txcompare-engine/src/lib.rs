//! txcompare Engine - Orchestration layer
//!
//! Turns a job directory into a finished run: startup checks, rule
//! loading, streaming categorization and output flushing.

pub mod commands;

pub use commands::compare::{compare_job, compare_job_with_rules, JobOutcome};
pub use commands::job::JobLayout;
pub use commands::report::render_report;
pub use commands::rules::{describe_rules, load_job_rules, RuleListing};
