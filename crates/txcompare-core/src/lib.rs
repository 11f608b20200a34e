//! txcompare Core - tolerance pipeline and categorization kernel
//!
//! This crate holds everything needed to categorize captured prod/dev
//! response pairs without touching the filesystem:
//! - Record, result and summary models
//! - Operation classification from request URLs
//! - Canonical (key-order independent) equality
//! - Tolerance rules, the declarative rule file and the pipeline runner
//! - The priority categorizer and the Parameters diff extractor
//! - Streaming aggregation into an injected delta sink
//!
//! Filesystem access lives in `txcompare-store`; job orchestration in
//! `txcompare-engine`.

pub mod aggregate;
pub mod canon;
pub mod categorize;
pub mod classify;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod params;
pub mod tolerance;

#[doc(hidden)]
pub use txcompare_core_types as core_types;

// Re-export commonly used types
pub use aggregate::{compare_stream, Aggregator, DeltaEnvelope, DeltaSink, MemoryDeltaSink};
pub use canon::{canonical_eq, canonicalize};
pub use categorize::categorize;
pub use classify::{classify_operation, Operation};
pub use diff::find_parameter_diffs;
pub use errors::{ExError, ExErrorKind, Result, TxCompareError};
pub use model::{Category, ComparisonRecord, ComparisonResult, EscalationBand, Outcome, Summary};
pub use tolerance::{load_rule_set_str, RuleAction, RuleKind, RuleSet, ToleranceRule};
