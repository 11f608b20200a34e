//! Rule-set loading for a job.

use crate::commands::job::JobLayout;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use txcompare_core::errors::ExError;
use txcompare_core::tolerance::{load_rule_set_str, RuleKind, RuleSet};
use txcompare_core::{log_op_end, log_op_error, log_op_start};
use txcompare_store::errors::{io_error, missing_job_file, Result};

/// Read and validate `<job>/tolerances.toml`.
///
/// # Errors
///
/// `ERR_NOT_FOUND` when the file is missing, `ERR_INVALID_RULE_SET` or
/// `ERR_DUPLICATE_RULE_ID` when it does not describe a usable rule set.
pub fn load_job_rules(job: &JobLayout) -> Result<RuleSet> {
    let path = job.rules();
    log_op_start!("load_rules", path = %path.display());
    let start = std::time::Instant::now();

    let result = fs::read_to_string(&path)
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => missing_job_file(&path),
            _ => io_error("read_rules", e),
        })
        .and_then(|text| load_rule_set_str(&text).map_err(ExError::from))
        .map_err(|e| {
            log_op_error!(
                "load_rules",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "load_rules",
        duration_ms = start.elapsed().as_millis() as u64,
        rule_count = result.len() as u64,
        rules_digest = %result.digest()
    );
    Ok(result)
}

/// One row of the rule listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleListing {
    pub position: usize,
    pub id: String,
    pub kind: RuleKind,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bug_id: Option<String>,
}

/// Rules in application order.
pub fn describe_rules(rules: &RuleSet) -> Vec<RuleListing> {
    rules
        .rules()
        .enumerate()
        .map(|(index, rule)| RuleListing {
            position: index + 1,
            id: rule.id().to_string(),
            kind: rule.kind(),
            description: rule.description().map(str::to_string),
            bug_id: rule.bug_id().map(str::to_string),
        })
        .collect()
}
