#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Reader → core stream → file sink, against real files.

use std::fs;
use tempfile::TempDir;
use txcompare_core::aggregate::DeltaEnvelope;
use txcompare_core::{compare_stream, Category, RuleSet, Summary};
use txcompare_core_types::RunId;
use txcompare_store::{read_summary, write_summary, FileDeltaSink, RecordReader};

fn line(id: &str, prod: u16, dev: u16) -> String {
    format!(
        r#"{{"id":"{}","url":"/r4/CodeSystem/$lookup?code=A","method":"GET","prod":{{"status":{}}},"dev":{{"status":{}}},"prodBody":"{{}}","devBody":"{{}}"}}"#,
        id, prod, dev
    )
}

#[test]
fn test_file_round_trip_preserves_order_and_counts() {
    // GIVEN an input file with good, blank and malformed lines
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("comparison.ndjson");
    let contents = [
        line("a", 200, 200),
        line("b", 200, 500),
        String::new(),
        "{truncated".to_string(),
        line("c", 200, 404),
    ]
    .join("\n");
    fs::write(&input, contents).unwrap();

    // WHEN the stream is categorized into a file sink
    let deltas = dir.path().join("results/deltas/deltas.ndjson");
    let mut sink = FileDeltaSink::create(&deltas).unwrap();
    let summary = compare_stream(
        RecordReader::open(&input).unwrap(),
        &RuleSet::empty(),
        &mut sink,
        Summary::new("job", RunId::new(), "t", "d"),
    )
    .unwrap();

    // THEN the blank line is ignored and the malformed one counted
    assert_eq!(summary.total_records, 4);
    assert_eq!(summary.invalid_lines, 1);
    assert_eq!(summary.category_count(Category::Ok), 1);

    // AND non-OK records appear in input order
    let ids: Vec<String> = fs::read_to_string(&deltas)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<DeltaEnvelope>(l).unwrap().id)
        .collect();
    assert_eq!(ids, vec!["b", "c"]);

    // AND the summary survives a write/read cycle
    let summary_path = dir.path().join("results/summary.json");
    write_summary(&summary_path, &summary).unwrap();
    assert_eq!(read_summary(&summary_path).unwrap(), summary);
}

#[test]
fn test_open_missing_input_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = RecordReader::open(&dir.path().join("comparison.ndjson"))
        .err()
        .unwrap();
    assert_eq!(err.code(), "ERR_NOT_FOUND");
}
