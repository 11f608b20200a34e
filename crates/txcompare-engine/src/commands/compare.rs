//! Whole-job comparison run.
//!
//! Startup checks happen before any output is touched: a missing input
//! file or an unusable rule file fails the run with nothing written.

use crate::commands::job::JobLayout;
use crate::commands::rules::load_job_rules;
use std::path::{Path, PathBuf};
use txcompare_core::errors::ExError;
use txcompare_core::model::Summary;
use txcompare_core::tolerance::RuleSet;
use txcompare_core::{compare_stream, log_op_end, log_op_error, log_op_start};
use txcompare_core_types::RunId;
use txcompare_store::errors::Result;
use txcompare_store::{clear_summary, write_summary, FileDeltaSink, RecordReader};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub summary: Summary,
    pub deltas_path: PathBuf,
    pub summary_path: PathBuf,
    pub deltas_written: u64,
}

/// Run a job using the rule file found in the job directory.
///
/// # Errors
///
/// Startup failures (missing input, missing or invalid rules), rule
/// failures during the run, and any output failure.
pub fn compare_job(job_dir: &Path) -> Result<JobOutcome> {
    let job = JobLayout::new(job_dir);
    JobLayout::require_file(&job.input())?;
    let rules = load_job_rules(&job)?;
    compare_job_with_rules(job_dir, &rules)
}

/// Run a job with an already-built rule set.
///
/// # Errors
///
/// As [`compare_job`], minus rule-file loading.
pub fn compare_job_with_rules(job_dir: &Path, rules: &RuleSet) -> Result<JobOutcome> {
    let job = JobLayout::new(job_dir);
    let run_id = RunId::new();
    log_op_start!(
        "compare_job",
        job_dir = %job_dir.display(),
        run_id = run_id.as_str()
    );
    let start = std::time::Instant::now();

    let outcome = run(&job, rules, run_id).map_err(|e| {
        log_op_error!(
            "compare_job",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "compare_job",
        duration_ms = start.elapsed().as_millis() as u64,
        total_records = outcome.summary.total_records,
        deltas_written = outcome.deltas_written
    );
    Ok(outcome)
}

fn run(job: &JobLayout, rules: &RuleSet, run_id: RunId) -> Result<JobOutcome> {
    let records = RecordReader::open(&job.input())?;
    let deltas_path = job.deltas();
    let summary_path = job.summary();

    // A failed run must not leave an earlier summary beside its deltas.
    clear_summary(&summary_path)?;
    let mut sink = FileDeltaSink::create(&deltas_path)?;
    let summary = Summary::started_now(job.root().display().to_string(), run_id, rules.digest());
    let summary = compare_stream(records, rules, &mut sink, summary).map_err(ExError::from)?;

    write_summary(&summary_path, &summary)?;
    tracing::info!(path = %summary_path.display(), "summary written");

    Ok(JobOutcome {
        deltas_written: sink.written(),
        summary,
        deltas_path,
        summary_path,
    })
}
