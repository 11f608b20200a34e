//! Comparison outcome types.
//!
//! A [`ComparisonResult`] serializes as a flat object tagged by `category`,
//! e.g. `{"category":"status-mismatch","op":"read","priority":"P4","prodStatus":200,"devStatus":302}`.

use crate::classify::Operation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a tolerance rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    /// Removes purely representational noise
    EquivAutofix,
    /// Masks an accepted-but-provisional behavioral gap
    TempTolerance,
    #[default]
    Unspecified,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::EquivAutofix => "equiv-autofix",
            RuleKind::TempTolerance => "temp-tolerance",
            RuleKind::Unspecified => "unspecified",
        }
    }

    /// Band credited when a rule of this kind changes a body.
    pub fn escalation_band(&self) -> EscalationBand {
        match self {
            RuleKind::TempTolerance => EscalationBand::TempTolerance,
            RuleKind::EquivAutofix | RuleKind::Unspecified => EscalationBand::EquivAutofix,
        }
    }
}

/// Which tier of tolerance explains an `OK` match.
///
/// Ordered by precedence: a later variant outranks an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EscalationBand {
    Strict,
    EquivAutofix,
    TempTolerance,
}

impl EscalationBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationBand::Strict => "strict",
            EscalationBand::EquivAutofix => "equiv-autofix",
            EscalationBand::TempTolerance => "temp-tolerance",
        }
    }
}

/// Triage priority ladder carried on every comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "SKIP")]
    Skip,
    P0,
    P1,
    P2,
    P3,
    P4,
    P6,
    #[serde(rename = "OK")]
    Ok,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Skip => "SKIP",
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
            Priority::P6 => "P6",
            Priority::Ok => "OK",
        }
    }
}

/// Outcome category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Skip,
    DevCrashOnValid,
    DevCrashOnError,
    MissingResource,
    StatusMismatch,
    ParseError,
    ResultDisagrees,
    Ok,
    ContentDiffers,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Skip => "SKIP",
            Category::DevCrashOnValid => "dev-crash-on-valid",
            Category::DevCrashOnError => "dev-crash-on-error",
            Category::MissingResource => "missing-resource",
            Category::StatusMismatch => "status-mismatch",
            Category::ParseError => "parse-error",
            Category::ResultDisagrees => "result-disagrees",
            Category::Ok => "OK",
            Category::ContentDiffers => "content-differs",
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            Category::Skip => Priority::Skip,
            Category::DevCrashOnValid => Priority::P0,
            Category::ResultDisagrees => Priority::P1,
            Category::DevCrashOnError => Priority::P2,
            Category::MissingResource => Priority::P3,
            Category::StatusMismatch => Priority::P4,
            Category::ParseError | Category::ContentDiffers => Priority::P6,
            Category::Ok => Priority::Ok,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which working body failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseFailure {
    Prod,
    Dev,
    Both,
}

/// Kind of a named-entry difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffKind {
    MissingInDev,
    ValueDiffers,
    ExtraInDev,
}

/// One itemized difference between Parameters entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDiff {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub param: String,
}

/// Category plus its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum Outcome {
    #[serde(rename = "SKIP")]
    Skip { reason: String, kind: RuleKind },

    #[serde(rename = "dev-crash-on-valid", rename_all = "camelCase")]
    DevCrashOnValid { prod_status: u16, dev_status: u16 },

    #[serde(rename = "dev-crash-on-error", rename_all = "camelCase")]
    DevCrashOnError { prod_status: u16, dev_status: u16 },

    #[serde(rename = "missing-resource", rename_all = "camelCase")]
    MissingResource { prod_status: u16, dev_status: u16 },

    #[serde(rename = "status-mismatch", rename_all = "camelCase")]
    StatusMismatch { prod_status: u16, dev_status: u16 },

    #[serde(rename = "parse-error")]
    ParseError { failed: ParseFailure },

    #[serde(rename = "result-disagrees", rename_all = "camelCase")]
    ResultDisagrees {
        prod_result: Value,
        dev_result: Value,
        system: Option<Value>,
        code: Option<Value>,
    },

    #[serde(rename = "OK")]
    Ok { band: EscalationBand },

    #[serde(rename = "content-differs")]
    ContentDiffers { diffs: Vec<ParamDiff> },
}

impl Outcome {
    pub fn category(&self) -> Category {
        match self {
            Outcome::Skip { .. } => Category::Skip,
            Outcome::DevCrashOnValid { .. } => Category::DevCrashOnValid,
            Outcome::DevCrashOnError { .. } => Category::DevCrashOnError,
            Outcome::MissingResource { .. } => Category::MissingResource,
            Outcome::StatusMismatch { .. } => Category::StatusMismatch,
            Outcome::ParseError { .. } => Category::ParseError,
            Outcome::ResultDisagrees { .. } => Category::ResultDisagrees,
            Outcome::Ok { .. } => Category::Ok,
            Outcome::ContentDiffers { .. } => Category::ContentDiffers,
        }
    }
}

/// Result of categorizing one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub op: Operation,
    pub priority: Priority,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ComparisonResult {
    pub fn new(op: Operation, outcome: Outcome) -> Self {
        Self {
            op,
            priority: outcome.category().priority(),
            outcome,
        }
    }

    pub fn category(&self) -> Category {
        self.outcome.category()
    }
}
