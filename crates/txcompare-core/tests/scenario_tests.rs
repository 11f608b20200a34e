#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end categorization scenarios over single records.

use serde_json::json;
use txcompare_core::model::{ComparisonRecord, SideMeta};
use txcompare_core::{
    categorize, load_rule_set_str, Category, EscalationBand, Outcome, RuleKind, RuleSet,
};

fn record(prod_status: u16, dev_status: u16, prod_body: &str, dev_body: &str) -> ComparisonRecord {
    ComparisonRecord {
        id: "scenario".to_string(),
        url: "/r4/CodeSystem/$validate-code?system=http://x&code=A".to_string(),
        method: "GET".to_string(),
        request_body: None,
        prod: SideMeta::with_status(prod_status),
        dev: SideMeta::with_status(dev_status),
        prod_body: Some(prod_body.to_string()),
        dev_body: Some(dev_body.to_string()),
        capture_match: None,
    }
}

#[test]
fn test_scenario_a_entry_key_order_is_ok() {
    // GIVEN two bodies whose only difference is key order inside an entry
    let prod = r#"{"resourceType":"Parameters","parameter":[{"name":"result","valueBoolean":true}]}"#;
    let dev = r#"{"resourceType":"Parameters","parameter":[{"valueBoolean":true,"name":"result"}]}"#;

    // WHEN categorized with no rules
    let result = categorize(&record(200, 200, prod, dev), &RuleSet::empty()).unwrap();

    // THEN the record is OK
    assert_eq!(result.category(), Category::Ok);
}

#[test]
fn test_scenario_b_dev_crash_on_valid() {
    let result = categorize(&record(200, 500, "{}", "{}"), &RuleSet::empty()).unwrap();
    assert_eq!(result.category(), Category::DevCrashOnValid);
}

#[test]
fn test_scenario_c_result_disagrees() {
    // GIVEN prod says true and dev says false for the same coding
    let body = |result: bool| {
        json!({
            "resourceType": "Parameters",
            "parameter": [
                {"name": "result", "valueBoolean": result},
                {"name": "system", "valueUri": "http://x"},
                {"name": "code", "valueCode": "A"}
            ]
        })
        .to_string()
    };

    // WHEN categorized
    let result = categorize(&record(200, 200, &body(true), &body(false)), &RuleSet::empty()).unwrap();

    // THEN the disagreement carries the coding
    match result.outcome {
        Outcome::ResultDisagrees { system, code, .. } => {
            assert_eq!(system, Some(json!("http://x")));
            assert_eq!(code, Some(json!("A")));
        }
        other => panic!("expected result-disagrees, got {:?}", other),
    }
}

#[test]
fn test_scenario_d_stripped_diagnostics_is_ok_with_rule_band() {
    // GIVEN a rule that strips `diagnostics` from both sides
    let rules = load_rule_set_str(
        r#"
[[rule]]
id = "strip-diagnostics"
kind = "temp-tolerance"
action = "normalize"
when = { has_param = "diagnostics" }
transform = [{ op = "strip-params", names = ["diagnostics"] }]
"#,
    )
    .unwrap();

    // AND dev carries an extra diagnostics entry
    let prod = json!({"resourceType": "Parameters", "parameter": [
        {"name": "result", "valueBoolean": true}
    ]});
    let dev = json!({"resourceType": "Parameters", "parameter": [
        {"name": "result", "valueBoolean": true},
        {"name": "diagnostics", "valueString": "cache miss"}
    ]});

    // WHEN categorized
    let result = categorize(
        &record(200, 200, &prod.to_string(), &dev.to_string()),
        &rules,
    )
    .unwrap();

    // THEN OK, credited to the rule's kind
    assert_eq!(
        result.outcome,
        Outcome::Ok {
            band: EscalationBand::TempTolerance
        }
    );
}

#[test]
fn test_scenario_e_skip_before_any_comparison() {
    // GIVEN a catch-all skip rule
    let rules = load_rule_set_str(
        r#"
[[rule]]
id = "known-flaky"
kind = "temp-tolerance"
action = "skip"
"#,
    )
    .unwrap();

    // WHEN categorizing records that would otherwise land anywhere
    for rec in [
        record(200, 500, "{}", "{}"),
        record(200, 200, "not json", "{}"),
        record(200, 200, r#"{"a":1}"#, r#"{"a":2}"#),
    ] {
        let result = categorize(&rec, &rules).unwrap();

        // THEN every one is skipped by that rule
        assert_eq!(
            result.outcome,
            Outcome::Skip {
                reason: "known-flaky".to_string(),
                kind: RuleKind::TempTolerance,
            }
        );
    }
}

#[test]
fn test_escalation_temp_tolerance_wins_over_equiv_autofix() {
    let rules = load_rule_set_str(
        r#"
[[rule]]
id = "sort-parameters"
kind = "equiv-autofix"
action = "normalize"
when = { parameters = true }
transform = [{ op = "sort-params-by-name" }]

[[rule]]
id = "drop-message"
kind = "temp-tolerance"
action = "normalize"
when = { parameters = true }
transform = [{ op = "strip-params", names = ["message"] }]
"#,
    )
    .unwrap();

    let prod = json!({"resourceType": "Parameters", "parameter": [
        {"name": "result", "valueBoolean": true},
        {"name": "display", "valueString": "Alpha"}
    ]});
    let dev = json!({"resourceType": "Parameters", "parameter": [
        {"name": "display", "valueString": "Alpha"},
        {"name": "message", "valueString": "note"},
        {"name": "result", "valueBoolean": true}
    ]});

    let result = categorize(
        &record(200, 200, &prod.to_string(), &dev.to_string()),
        &rules,
    )
    .unwrap();
    assert_eq!(
        result.outcome,
        Outcome::Ok {
            band: EscalationBand::TempTolerance
        }
    );
}
