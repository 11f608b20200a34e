//! Tolerance pipeline runner.
//!
//! Applies a [`RuleSet`] strictly in list order. Each stage takes the
//! working context by value and hands back a new one, so no rule ever sees
//! state aliased from another record.
//!
//! `normalized_by` records the highest escalation band among rules that
//! fired `normalize` *and* changed the serialized bodies. A rule that
//! matches but leaves both bodies byte-identical earns no credit.

use crate::errors::Result;
use crate::model::{EscalationBand, RuleKind};
use crate::tolerance::{ComparisonContext, RuleAction, RuleSet, ToleranceRule};

/// Result of running every rule over one record.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome<'r> {
    /// A rule excluded the record; later rules never ran.
    Skipped { rule_id: String, kind: RuleKind },
    /// Every rule ran; `ctx` holds the post-normalization bodies.
    Completed {
        ctx: ComparisonContext<'r>,
        normalized_by: Option<EscalationBand>,
    },
}

/// Working state between stages.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState<'r> {
    pub ctx: ComparisonContext<'r>,
    pub normalized_by: Option<EscalationBand>,
}

impl<'r> PipelineState<'r> {
    pub fn new(ctx: ComparisonContext<'r>) -> Self {
        Self {
            ctx,
            normalized_by: None,
        }
    }
}

/// Outcome of one stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage<'r> {
    Continue(PipelineState<'r>),
    Skip { rule_id: String, kind: RuleKind },
}

/// Apply a single rule.
///
/// # Errors
///
/// Propagates any error returned by the rule.
pub fn apply_rule<'r>(state: PipelineState<'r>, rule: &dyn ToleranceRule) -> Result<Stage<'r>> {
    match rule.evaluate(&state.ctx)? {
        RuleAction::None => Ok(Stage::Continue(state)),
        RuleAction::Skip => {
            tracing::debug!(
                record_id = %state.ctx.record.id,
                rule_id = rule.id(),
                "record skipped by rule"
            );
            Ok(Stage::Skip {
                rule_id: rule.id().to_string(),
                kind: rule.kind(),
            })
        }
        RuleAction::Normalize => {
            let normalized = match (&state.ctx.prod, &state.ctx.dev) {
                (Some(prod), Some(dev)) => {
                    let out = rule.normalize(state.ctx.record, prod, dev)?;
                    let changed = out.prod.to_string() != prod.to_string()
                        || out.dev.to_string() != dev.to_string();
                    Some((out, changed))
                }
                _ => None,
            };
            let Some((out, changed)) = normalized else {
                return Ok(Stage::Continue(state));
            };

            let normalized_by = if changed {
                tracing::trace!(
                    record_id = %state.ctx.record.id,
                    rule_id = rule.id(),
                    "rule changed bodies"
                );
                let band = rule.kind().escalation_band();
                Some(state.normalized_by.map_or(band, |current| current.max(band)))
            } else {
                state.normalized_by
            };

            Ok(Stage::Continue(PipelineState {
                ctx: state.ctx.with_bodies(out.prod, out.dev),
                normalized_by,
            }))
        }
    }
}

/// Run every rule of `rules` over `ctx`, halting at the first skip.
///
/// # Errors
///
/// Propagates the first rule error; the record is not categorized.
pub fn run_pipeline<'r>(
    rules: &RuleSet,
    ctx: ComparisonContext<'r>,
) -> Result<PipelineOutcome<'r>> {
    let mut state = PipelineState::new(ctx);
    for rule in rules.rules() {
        state = match apply_rule(state, rule)? {
            Stage::Continue(next) => next,
            Stage::Skip { rule_id, kind } => {
                return Ok(PipelineOutcome::Skipped { rule_id, kind });
            }
        };
    }
    Ok(PipelineOutcome::Completed {
        ctx: state.ctx,
        normalized_by: state.normalized_by,
    })
}
