#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Properties that hold for every record regardless of content.

use proptest::prelude::*;
use txcompare_core::model::{ComparisonRecord, SideMeta};
use txcompare_core::{categorize, Category, RuleSet};

fn arb_body() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("<html>oops</html>".to_string())),
        Just(Some(r#"{"resourceType":"Parameters","parameter":[{"name":"result","valueBoolean":true}]}"#.to_string())),
        Just(Some(r#"{"resourceType":"Parameters","parameter":[{"name":"result","valueBoolean":false}]}"#.to_string())),
        Just(Some(r#"{"resourceType":"ValueSet","id":"x"}"#.to_string())),
    ]
}

fn arb_status() -> impl Strategy<Value = u16> {
    prop_oneof![Just(200u16), Just(201), Just(302), Just(400), Just(404), Just(422), Just(500)]
}

fn record(prod: u16, dev: u16, prod_body: Option<String>, dev_body: Option<String>) -> ComparisonRecord {
    ComparisonRecord {
        id: "prop".to_string(),
        url: "/r4/ValueSet/$validate-code".to_string(),
        method: "POST".to_string(),
        request_body: None,
        prod: SideMeta::with_status(prod),
        dev: SideMeta::with_status(dev),
        prod_body,
        dev_body,
        capture_match: None,
    }
}

proptest! {
    #[test]
    fn prop_status_mismatch_never_reaches_body_branches(
        prod in arb_status(),
        dev in arb_status(),
        prod_body in arb_body(),
        dev_body in arb_body(),
    ) {
        prop_assume!(prod != dev);
        let result = categorize(&record(prod, dev, prod_body, dev_body), &RuleSet::empty()).unwrap();
        prop_assert!(matches!(
            result.category(),
            Category::DevCrashOnValid
                | Category::DevCrashOnError
                | Category::MissingResource
                | Category::StatusMismatch
        ));
    }

    #[test]
    fn prop_priority_follows_category(
        prod in arb_status(),
        dev in arb_status(),
        prod_body in arb_body(),
        dev_body in arb_body(),
    ) {
        let result = categorize(&record(prod, dev, prod_body, dev_body), &RuleSet::empty()).unwrap();
        prop_assert_eq!(result.priority, result.category().priority());
    }

    #[test]
    fn prop_equal_status_never_yields_status_category(
        status in arb_status(),
        prod_body in arb_body(),
        dev_body in arb_body(),
    ) {
        let result = categorize(&record(status, status, prod_body, dev_body), &RuleSet::empty()).unwrap();
        prop_assert!(!matches!(
            result.category(),
            Category::DevCrashOnValid
                | Category::DevCrashOnError
                | Category::MissingResource
                | Category::StatusMismatch
                | Category::Skip
        ));
    }
}
