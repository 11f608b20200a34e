//! Run command
//!
//! Usage: txcompare run <JOB_DIR>

use clap::Args;
use std::path::PathBuf;
use txcompare_engine::{compare_job, render_report};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Job directory holding comparison.ndjson and tolerances.toml
    pub job_dir: PathBuf,
}

/// Execute run command
pub fn execute(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("Job directory: {}", args.job_dir.display());

    let outcome = compare_job(&args.job_dir)?;

    println!();
    print!("{}", render_report(&outcome.summary));
    println!();
    println!("Deltas: {}", outcome.deltas_path.display());
    println!("Summary: {}", outcome.summary_path.display());
    Ok(())
}
