//! Priority decision procedure.
//!
//! Every record lands in exactly one category. Branches are tried in order
//! and the first that applies wins:
//!
//! 1. a tolerance rule skipped the record → `SKIP`
//! 2. prod and dev statuses differ → one of the status categories
//! 3. either working body is absent → `parse-error`
//! 4. both sides report a `result` parameter and they disagree →
//!    `result-disagrees`
//! 5. working bodies are canonically equal → `OK`
//! 6. anything else → `content-differs`
//!
//! The tolerance pipeline always runs first, so a skip rule wins even over
//! a status mismatch.

use crate::canon::canonical_eq;
use crate::classify::classify_operation;
use crate::diff::find_parameter_diffs;
use crate::errors::Result;
use crate::model::{ComparisonRecord, ComparisonResult, EscalationBand, Outcome, ParseFailure};
use crate::params::{is_truthy, ParamAccessor};
use crate::tolerance::{run_pipeline, ComparisonContext, PipelineOutcome, RuleSet};
use serde_json::Value;

/// Categorize one record against `rules`.
///
/// # Errors
///
/// Propagates a rule failure. Unparsable bodies are not errors; they
/// produce `parse-error`.
pub fn categorize(record: &ComparisonRecord, rules: &RuleSet) -> Result<ComparisonResult> {
    let op = classify_operation(&record.url);
    let outcome = match run_pipeline(rules, ComparisonContext::new(record))? {
        PipelineOutcome::Skipped { rule_id, kind } => Outcome::Skip {
            reason: rule_id,
            kind,
        },
        PipelineOutcome::Completed { ctx, normalized_by } => {
            decide(record, ctx.prod, ctx.dev, normalized_by, rules.accessor())
        }
    };
    Ok(ComparisonResult::new(op, outcome))
}

fn decide(
    record: &ComparisonRecord,
    prod: Option<Value>,
    dev: Option<Value>,
    normalized_by: Option<EscalationBand>,
    accessor: &dyn ParamAccessor,
) -> Outcome {
    if let Some(outcome) = status_outcome(record.prod.status, record.dev.status) {
        return outcome;
    }

    let (prod, dev) = match (prod, dev) {
        (Some(prod), Some(dev)) => (prod, dev),
        (None, Some(_)) => {
            return Outcome::ParseError {
                failed: ParseFailure::Prod,
            }
        }
        (Some(_), None) => {
            return Outcome::ParseError {
                failed: ParseFailure::Dev,
            }
        }
        (None, None) => {
            return Outcome::ParseError {
                failed: ParseFailure::Both,
            }
        }
    };

    if let (Some(prod_result), Some(dev_result)) = (
        accessor.value(&prod, "result"),
        accessor.value(&dev, "result"),
    ) {
        if !canonical_eq(prod_result, dev_result) {
            return Outcome::ResultDisagrees {
                prod_result: prod_result.clone(),
                dev_result: dev_result.clone(),
                system: prefer_prod(accessor, &prod, &dev, "system"),
                code: prefer_prod(accessor, &prod, &dev, "code"),
            };
        }
    }

    if canonical_eq(&prod, &dev) {
        let band = if record.matched_at_capture() {
            EscalationBand::Strict
        } else {
            normalized_by.unwrap_or(EscalationBand::EquivAutofix)
        };
        return Outcome::Ok { band };
    }

    Outcome::ContentDiffers {
        diffs: find_parameter_diffs(&prod, &dev),
    }
}

/// Status branch, `None` when both sides agree.
fn status_outcome(prod_status: u16, dev_status: u16) -> Option<Outcome> {
    if prod_status == dev_status {
        return None;
    }
    let outcome = match (prod_status, dev_status) {
        (200, 500) => Outcome::DevCrashOnValid {
            prod_status,
            dev_status,
        },
        (_, 500) => Outcome::DevCrashOnError {
            prod_status,
            dev_status,
        },
        (200, 404) => Outcome::MissingResource {
            prod_status,
            dev_status,
        },
        _ => Outcome::StatusMismatch {
            prod_status,
            dev_status,
        },
    };
    Some(outcome)
}

/// Prod's value when truthy, otherwise whatever dev has.
fn prefer_prod(
    accessor: &dyn ParamAccessor,
    prod: &Value,
    dev: &Value,
    name: &str,
) -> Option<Value> {
    accessor
        .value(prod, name)
        .filter(|value| is_truthy(value))
        .or_else(|| accessor.value(dev, name))
        .cloned()
}
