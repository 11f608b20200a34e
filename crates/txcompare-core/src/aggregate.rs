//! Delta stream and summary accumulation.
//!
//! [`compare_stream`] drives one record at a time through the categorizer:
//! the next record is not pulled from the input until the current one has
//! been categorized and, when it is not `OK`, handed to the [`DeltaSink`].
//! Memory use is bounded by one record plus the summary counters.

use crate::categorize::categorize;
use crate::errors::{Result, TxCompareError};
use crate::model::{ComparisonRecord, ComparisonResult, SideMeta, Summary};
use crate::tolerance::RuleSet;
use crate::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Records between progress log lines.
pub const PROGRESS_EVERY: u64 = 1000;

/// One line of the delta stream.
///
/// Bodies are the raw captured text, never the normalized working copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaEnvelope {
    pub id: String,
    pub url: String,
    pub method: String,
    pub prod: SideMeta,
    pub dev: SideMeta,
    pub comparison: ComparisonResult,
    pub prod_body: Option<String>,
    pub dev_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
}

impl DeltaEnvelope {
    pub fn new(record: &ComparisonRecord, comparison: ComparisonResult) -> Self {
        Self {
            id: record.id.clone(),
            url: record.url.clone(),
            method: record.method.clone(),
            prod: record.prod.clone(),
            dev: record.dev.clone(),
            comparison,
            prod_body: record.prod_body.clone(),
            dev_body: record.dev_body.clone(),
            request_body: record.request_body.clone(),
        }
    }

    /// Single-line JSON form.
    ///
    /// # Errors
    ///
    /// `Serialization` if the envelope cannot be encoded.
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Append-only destination for delta envelopes.
pub trait DeltaSink {
    /// Append one envelope.
    ///
    /// # Errors
    ///
    /// Any write failure; the run treats it as fatal.
    fn write_delta(&mut self, delta: &DeltaEnvelope) -> Result<()>;

    /// Flush buffered output. Called once after the last record.
    ///
    /// # Errors
    ///
    /// Any flush failure; the run treats it as fatal.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sink that keeps rendered lines in memory.
#[derive(Debug, Default)]
pub struct MemoryDeltaSink {
    lines: Vec<String>,
    finished: bool,
}

impl MemoryDeltaSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Parse every stored line back into an envelope.
    ///
    /// # Errors
    ///
    /// `Serialization` if a stored line is not a valid envelope.
    pub fn envelopes(&self) -> Result<Vec<DeltaEnvelope>> {
        self.lines
            .iter()
            .map(|line| serde_json::from_str(line).map_err(TxCompareError::from))
            .collect()
    }
}

impl DeltaSink for MemoryDeltaSink {
    fn write_delta(&mut self, delta: &DeltaEnvelope) -> Result<()> {
        self.lines.push(delta.to_line()?);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Routes categorized records to the summary and the sink.
pub struct Aggregator<'s> {
    summary: Summary,
    sink: &'s mut dyn DeltaSink,
    deltas_written: u64,
}

impl<'s> Aggregator<'s> {
    pub fn new(summary: Summary, sink: &'s mut dyn DeltaSink) -> Self {
        Self {
            summary,
            sink,
            deltas_written: 0,
        }
    }

    /// Count one categorized record and persist it unless it is `OK`.
    ///
    /// # Errors
    ///
    /// Propagates sink failures.
    pub fn observe(&mut self, record: &ComparisonRecord, result: ComparisonResult) -> Result<()> {
        self.summary.record(result.op, &result.outcome);
        if result.category() != crate::model::Category::Ok {
            self.sink.write_delta(&DeltaEnvelope::new(record, result))?;
            self.deltas_written += 1;
        }
        Ok(())
    }

    /// Count an input line that never became a record.
    pub fn invalid_line(&mut self) {
        self.summary.record_invalid_line();
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn deltas_written(&self) -> u64 {
        self.deltas_written
    }

    /// Flush the sink and hand back the finished summary.
    ///
    /// # Errors
    ///
    /// Propagates the sink's flush failure.
    pub fn finish(self) -> Result<Summary> {
        self.sink.finish()?;
        Ok(self.summary)
    }
}

/// Categorize every record of `records`, streaming deltas into `sink`.
///
/// Items that fail with `InvalidRecord` are logged and counted as invalid
/// lines; any other error aborts the run, as does a rule failure.
///
/// # Errors
///
/// The first rule, input or sink failure.
pub fn compare_stream<I>(
    records: I,
    rules: &RuleSet,
    sink: &mut dyn DeltaSink,
    summary: Summary,
) -> Result<Summary>
where
    I: IntoIterator<Item = Result<ComparisonRecord>>,
{
    let start = Instant::now();
    log_op_start!(
        "compare_stream",
        run_id = summary.run_id.as_str(),
        rule_count = rules.len() as u64
    );

    match stream_records(records, rules, sink, summary) {
        Ok(summary) => {
            log_op_end!(
                "compare_stream",
                duration_ms = start.elapsed().as_millis() as u64,
                total_records = summary.total_records,
                invalid_lines = summary.invalid_lines
            );
            Ok(summary)
        }
        Err(err) => {
            log_op_error!(
                "compare_stream",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

fn stream_records<I>(
    records: I,
    rules: &RuleSet,
    sink: &mut dyn DeltaSink,
    summary: Summary,
) -> Result<Summary>
where
    I: IntoIterator<Item = Result<ComparisonRecord>>,
{
    let mut aggregator = Aggregator::new(summary, sink);

    for item in records {
        match item {
            Ok(record) => {
                let result = categorize(&record, rules)?;
                tracing::debug!(
                    record_id = %record.id,
                    category = result.category().as_str(),
                    op = result.op.as_str(),
                    "record categorized"
                );
                aggregator.observe(&record, result)?;
            }
            Err(TxCompareError::InvalidRecord { line, reason }) => {
                tracing::warn!(line, reason = %reason, "skipping malformed input line");
                aggregator.invalid_line();
            }
            Err(err) => return Err(err),
        }

        let total = aggregator.summary().total_records;
        if total % PROGRESS_EVERY == 0 {
            tracing::info!(total_records = total, "progress");
        }
    }

    aggregator.finish()
}
