#![allow(clippy::unwrap_used, clippy::expect_used)]

use tracing::Level;
use txcompare_core::errors::{ExErrorKind, TxCompareError};
use txcompare_core::logging_facility::test_capture::init_test_capture;
use txcompare_core::model::{ComparisonRecord, SideMeta};
use txcompare_core::{compare_stream, log_op_end, log_op_error, log_op_start};
use txcompare_core::{MemoryDeltaSink, RuleSet, Summary};
use txcompare_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use txcompare_core_types::RunId;

#[test]
fn test_log_op_start_and_end() {
    let capture = init_test_capture();
    let op = "logging_tests_start_end";

    log_op_start!(op, job_dir = "jobs/a");
    log_op_end!(op, duration_ms = 42);

    let start = capture.find_op_event(op, EVENT_START).unwrap();
    assert_eq!(start.field("job_dir"), Some("jobs/a"));
    let end = capture.find_op_event(op, EVENT_END).unwrap();
    assert_eq!(end.field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_carries_stable_code() {
    let capture = init_test_capture();
    let op = "logging_tests_error";

    let err = TxCompareError::MissingJobFile {
        path: "jobs/a/comparison.ndjson".to_string(),
    };
    log_op_error!(op, err, duration_ms = 3);

    let event = capture.find_op_event(op, EVENT_END_ERROR).unwrap();
    assert_eq!(event.level, Level::ERROR);
    assert_eq!(event.field("err_code"), Some(ExErrorKind::NotFound.code()));
}

#[test]
fn test_compare_stream_logs_records_and_bad_lines() {
    let capture = init_test_capture();
    let run_id = RunId::new();

    let good = ComparisonRecord {
        id: "logging-tests-record".to_string(),
        url: "/r4/CodeSystem/$lookup".to_string(),
        method: "GET".to_string(),
        request_body: None,
        prod: SideMeta::with_status(200),
        dev: SideMeta::with_status(500),
        prod_body: None,
        dev_body: None,
        capture_match: None,
    };
    let input = vec![
        Ok(good),
        Err(TxCompareError::InvalidRecord {
            line: 424_242,
            reason: "EOF while parsing".to_string(),
        }),
    ];

    let mut sink = MemoryDeltaSink::new();
    let summary = Summary::new("jobs/logging", run_id.clone(), "t", "d");
    compare_stream(input, &RuleSet::empty(), &mut sink, summary).unwrap();

    let per_record = capture.events_for_record("logging-tests-record");
    assert_eq!(per_record.len(), 1);
    assert_eq!(per_record[0].level, Level::DEBUG);
    assert_eq!(per_record[0].field("category"), Some("dev-crash-on-valid"));

    let warnings = capture.events_where("line", "424242");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].level, Level::WARN);

    let runs = capture.events_where("run_id", run_id.as_str());
    assert!(runs
        .iter()
        .any(|e| e.op() == Some("compare_stream") && e.event() == Some(EVENT_START)));
}
