//! Rules command
//!
//! Usage: txcompare rules <JOB_DIR> [--json]

use clap::Args;
use std::path::PathBuf;
use txcompare_engine::{describe_rules, load_job_rules, JobLayout};

#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Job directory holding tolerances.toml
    pub job_dir: PathBuf,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute rules command
pub fn execute(args: RulesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let rules = load_job_rules(&JobLayout::new(&args.job_dir))?;
    let listing = describe_rules(&rules);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{} rules (digest {})", listing.len(), rules.digest());
    for rule in &listing {
        let mut line = format!("  {:>3}. {} [{}]", rule.position, rule.id, rule.kind.as_str());
        if let Some(bug_id) = &rule.bug_id {
            line.push_str(&format!(" (bug {})", bug_id));
        }
        if let Some(description) = &rule.description {
            line.push(' ');
            line.push_str(description);
        }
        println!("{}", line);
    }
    Ok(())
}
