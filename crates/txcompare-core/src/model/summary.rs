//! Run-scoped summary accumulator.
//!
//! Counts live in `BTreeMap`s so the flushed document is deterministic.
//! Summaries from independent shards combine with [`Summary::merge`].

use crate::classify::Operation;
use crate::model::result::{Category, EscalationBand, Outcome};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use txcompare_core_types::RunId;

/// OK sub-bucket counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkBreakdown {
    pub strict: u64,
    #[serde(rename = "equiv-autofix")]
    pub equiv_autofix: u64,
    #[serde(rename = "temp-tolerance")]
    pub temp_tolerance: u64,
}

impl OkBreakdown {
    fn bump(&mut self, band: EscalationBand) {
        match band {
            EscalationBand::Strict => self.strict += 1,
            EscalationBand::EquivAutofix => self.equiv_autofix += 1,
            EscalationBand::TempTolerance => self.temp_tolerance += 1,
        }
    }
}

/// Summary document written once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub job_dir: String,
    pub run_id: RunId,
    pub timestamp: String,
    pub rules_digest: String,
    pub total_records: u64,
    pub invalid_lines: u64,
    pub skipped: u64,
    pub skipped_by_kind: BTreeMap<String, u64>,
    pub skipped_reasons: BTreeMap<String, u64>,
    pub categories: BTreeMap<String, u64>,
    pub ok_breakdown: OkBreakdown,
    pub operation_breakdown: BTreeMap<String, BTreeMap<String, u64>>,
}

impl Summary {
    pub fn new(
        job_dir: impl Into<String>,
        run_id: RunId,
        timestamp: impl Into<String>,
        rules_digest: impl Into<String>,
    ) -> Self {
        Self {
            job_dir: job_dir.into(),
            run_id,
            timestamp: timestamp.into(),
            rules_digest: rules_digest.into(),
            total_records: 0,
            invalid_lines: 0,
            skipped: 0,
            skipped_by_kind: BTreeMap::new(),
            skipped_reasons: BTreeMap::new(),
            categories: BTreeMap::new(),
            ok_breakdown: OkBreakdown::default(),
            operation_breakdown: BTreeMap::new(),
        }
    }

    /// Fresh summary stamped with the current UTC time.
    pub fn started_now(
        job_dir: impl Into<String>,
        run_id: RunId,
        rules_digest: impl Into<String>,
    ) -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Self::new(job_dir, run_id, timestamp, rules_digest)
    }

    /// Count an input line that could not be decoded as a record.
    pub fn record_invalid_line(&mut self) {
        self.total_records += 1;
        self.invalid_lines += 1;
    }

    /// Count one categorized record.
    ///
    /// Skipped records are tallied only under the skip counters; every other
    /// category feeds `categories` and `operationBreakdown`.
    pub fn record(&mut self, op: Operation, outcome: &Outcome) {
        self.total_records += 1;

        if let Outcome::Skip { reason, kind } = outcome {
            self.skipped += 1;
            *self.skipped_by_kind.entry(kind.as_str().to_string()).or_insert(0) += 1;
            *self.skipped_reasons.entry(reason.clone()).or_insert(0) += 1;
            return;
        }

        let category = outcome.category();
        *self
            .categories
            .entry(category.as_str().to_string())
            .or_insert(0) += 1;
        *self
            .operation_breakdown
            .entry(op.as_str().to_string())
            .or_default()
            .entry(category.as_str().to_string())
            .or_insert(0) += 1;

        if let Outcome::Ok { band } = outcome {
            self.ok_breakdown.bump(*band);
        }
    }

    /// Number of records assigned `category`.
    pub fn category_count(&self, category: Category) -> u64 {
        if category == Category::Skip {
            return self.skipped;
        }
        self.categories
            .get(category.as_str())
            .copied()
            .unwrap_or(0)
    }

    /// Add another shard's counts into this summary, key by key.
    ///
    /// Run identity (`jobDir`, `runId`, `timestamp`, `rulesDigest`) is kept
    /// from `self`.
    pub fn merge(&mut self, other: &Summary) {
        self.total_records += other.total_records;
        self.invalid_lines += other.invalid_lines;
        self.skipped += other.skipped;
        add_counts(&mut self.skipped_by_kind, &other.skipped_by_kind);
        add_counts(&mut self.skipped_reasons, &other.skipped_reasons);
        add_counts(&mut self.categories, &other.categories);
        self.ok_breakdown.strict += other.ok_breakdown.strict;
        self.ok_breakdown.equiv_autofix += other.ok_breakdown.equiv_autofix;
        self.ok_breakdown.temp_tolerance += other.ok_breakdown.temp_tolerance;
        for (op, counts) in &other.operation_breakdown {
            add_counts(
                self.operation_breakdown.entry(op.clone()).or_default(),
                counts,
            );
        }
    }
}

fn add_counts(into: &mut BTreeMap<String, u64>, from: &BTreeMap<String, u64>) {
    for (key, count) in from {
        *into.entry(key.clone()).or_insert(0) += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::result::RuleKind;

    fn summary() -> Summary {
        Summary::new(
            "jobs/round-1",
            RunId::from_string("run".to_string()),
            "2026-01-01T00:00:00.000Z",
            "digest",
        )
    }

    #[test]
    fn test_skip_is_not_a_category() {
        let mut s = summary();
        s.record(
            Operation::Metadata,
            &Outcome::Skip {
                reason: "skip-metadata-ops".to_string(),
                kind: RuleKind::EquivAutofix,
            },
        );
        assert_eq!(s.total_records, 1);
        assert_eq!(s.skipped, 1);
        assert_eq!(s.skipped_reasons["skip-metadata-ops"], 1);
        assert_eq!(s.skipped_by_kind["equiv-autofix"], 1);
        assert!(s.categories.is_empty());
        assert!(s.operation_breakdown.is_empty());
    }

    #[test]
    fn test_ok_feeds_breakdown_and_operation_table() {
        let mut s = summary();
        s.record(
            Operation::ValidateCode,
            &Outcome::Ok {
                band: EscalationBand::Strict,
            },
        );
        s.record(
            Operation::ValidateCode,
            &Outcome::Ok {
                band: EscalationBand::TempTolerance,
            },
        );
        assert_eq!(s.category_count(Category::Ok), 2);
        assert_eq!(s.ok_breakdown.strict, 1);
        assert_eq!(s.ok_breakdown.temp_tolerance, 1);
        assert_eq!(s.operation_breakdown["validate-code"]["OK"], 2);
    }

    #[test]
    fn test_invalid_line_counts_toward_total() {
        let mut s = summary();
        s.record_invalid_line();
        assert_eq!(s.total_records, 1);
        assert_eq!(s.invalid_lines, 1);
        assert!(s.categories.is_empty());
    }

    #[test]
    fn test_merge_adds_key_wise() {
        let mut a = summary();
        a.record(
            Operation::Read,
            &Outcome::MissingResource {
                prod_status: 200,
                dev_status: 404,
            },
        );
        let mut b = summary();
        b.record(
            Operation::Read,
            &Outcome::MissingResource {
                prod_status: 200,
                dev_status: 404,
            },
        );
        b.record(
            Operation::Expand,
            &Outcome::Ok {
                band: EscalationBand::EquivAutofix,
            },
        );
        b.record_invalid_line();

        a.merge(&b);
        assert_eq!(a.total_records, 4);
        assert_eq!(a.invalid_lines, 1);
        assert_eq!(a.categories["missing-resource"], 2);
        assert_eq!(a.operation_breakdown["read"]["missing-resource"], 2);
        assert_eq!(a.operation_breakdown["expand"]["OK"], 1);
        assert_eq!(a.ok_breakdown.equiv_autofix, 1);
    }

    #[test]
    fn test_started_now_timestamp_is_utc_millis() {
        let s = Summary::started_now("job", RunId::new(), "d");
        assert!(s.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&s.timestamp).is_ok());
        assert_eq!(s.timestamp.len(), "2026-01-01T00:00:00.000Z".len());
    }

    #[test]
    fn test_summary_field_names() {
        let s = summary();
        let value = serde_json::to_value(&s).unwrap();
        for key in [
            "jobDir",
            "timestamp",
            "totalRecords",
            "skipped",
            "skippedByKind",
            "skippedReasons",
            "categories",
            "okBreakdown",
            "operationBreakdown",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert!(value["okBreakdown"].get("equiv-autofix").is_some());
    }
}
