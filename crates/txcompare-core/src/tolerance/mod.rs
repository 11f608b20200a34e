//! Tolerance rules.
//!
//! A rule inspects a [`ComparisonContext`] and answers with a
//! [`RuleAction`]: leave the record alone, exclude it from comparison, or
//! rewrite both working bodies. Rules are injected as an ordered
//! [`RuleSet`]; the [`pipeline`] applies them.
//!
//! ## Contract
//!
//! - `normalize` is a pure function of its inputs.
//! - Rules must cope with absent or unparsable bodies without failing.
//! - A rule that does fail returns an error, which aborts the run.

pub mod config;
pub mod declarative;
pub mod pipeline;

use crate::canon::canonical_digest;
use crate::errors::{Result, TxCompareError};
use crate::model::ComparisonRecord;
use crate::params::{ParamAccessor, ParametersAccessor};
use serde_json::{json, Value};
use std::collections::HashSet;

pub use crate::model::RuleKind;
pub use config::{load_rule_set_str, RuleDef, RuleFile};
pub use declarative::{DeclarativeRule, Matcher, Transform};
pub use pipeline::{run_pipeline, PipelineOutcome};

/// Per-record working state.
///
/// `prod`/`dev` hold the current working bodies, `None` when the raw body
/// was absent or failed to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonContext<'r> {
    pub record: &'r ComparisonRecord,
    pub prod: Option<Value>,
    pub dev: Option<Value>,
}

impl<'r> ComparisonContext<'r> {
    /// Context with both bodies parsed from the raw record.
    pub fn new(record: &'r ComparisonRecord) -> Self {
        Self {
            record,
            prod: record.parsed_prod(),
            dev: record.parsed_dev(),
        }
    }

    /// Same record, replacement working bodies.
    pub fn with_bodies(self, prod: Value, dev: Value) -> Self {
        Self {
            record: self.record,
            prod: Some(prod),
            dev: Some(dev),
        }
    }
}

/// Answer of [`ToleranceRule::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    None,
    Skip,
    Normalize,
}

/// Output of [`ToleranceRule::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBodies {
    pub prod: Value,
    pub dev: Value,
}

/// A unit of domain knowledge about acceptable prod/dev differences.
pub trait ToleranceRule: Send + Sync {
    /// Unique id within a rule set.
    fn id(&self) -> &str;

    fn kind(&self) -> RuleKind {
        RuleKind::Unspecified
    }

    fn description(&self) -> Option<&str> {
        None
    }

    /// Tracker reference for the defect a temporary tolerance covers.
    fn bug_id(&self) -> Option<&str> {
        None
    }

    /// Decide what to do with this record.
    fn evaluate(&self, ctx: &ComparisonContext<'_>) -> Result<RuleAction>;

    /// Rewrite both bodies. Called only after [`RuleAction::Normalize`] and
    /// only when both working bodies are present.
    fn normalize(
        &self,
        record: &ComparisonRecord,
        _prod: &Value,
        _dev: &Value,
    ) -> Result<NormalizedBodies> {
        Err(TxCompareError::RuleFailed {
            rule_id: self.id().to_string(),
            record_id: record.id.clone(),
            reason: "rule asked to normalize but defines no normalize step".to_string(),
        })
    }
}

/// Ordered, immutable rule list plus the parameter-value accessor.
pub struct RuleSet {
    rules: Vec<Box<dyn ToleranceRule>>,
    accessor: Box<dyn ParamAccessor>,
}

impl RuleSet {
    /// Build a rule set, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// `DuplicateRuleId` if two rules share an id.
    pub fn new(rules: Vec<Box<dyn ToleranceRule>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.id().to_string()) {
                return Err(TxCompareError::DuplicateRuleId {
                    rule_id: rule.id().to_string(),
                });
            }
        }
        Ok(Self {
            rules,
            accessor: Box::new(ParametersAccessor),
        })
    }

    /// A rule set with no rules: every comparison is strict.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            accessor: Box::new(ParametersAccessor),
        }
    }

    /// Replace the parameter-value accessor.
    pub fn with_accessor(mut self, accessor: impl ParamAccessor + 'static) -> Self {
        self.accessor = Box::new(accessor);
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn ToleranceRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    pub fn accessor(&self) -> &dyn ParamAccessor {
        self.accessor.as_ref()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// SHA-256 over the ordered `(id, kind)` list.
    ///
    /// Two runs with the same digest applied the same rules in the same order.
    pub fn digest(&self) -> String {
        let listing: Vec<Value> = self
            .rules()
            .map(|rule| json!([rule.id(), rule.kind().as_str()]))
            .collect();
        canonical_digest(&Value::Array(listing))
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rules().map(|r| r.id()).collect::<Vec<_>>())
            .finish()
    }
}
