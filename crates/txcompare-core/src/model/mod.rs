//! Data contracts shared by the pipeline, categorizer and aggregator.

pub mod record;
pub mod result;
pub mod summary;

pub use record::{ComparisonRecord, SideMeta};
pub use result::{
    Category, ComparisonResult, DiffKind, EscalationBand, Outcome, ParamDiff, ParseFailure,
    Priority, RuleKind,
};
pub use summary::{OkBreakdown, Summary};
