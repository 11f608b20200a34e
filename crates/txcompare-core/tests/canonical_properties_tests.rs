#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use serde_json::{Map, Value};
use txcompare_core::canon::canonical_string;
use txcompare_core::{canonical_eq, canonicalize};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

/// Render an object's members in reverse key order as JSON text.
fn render_reversed(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let members: Vec<String> = map
                .iter()
                .rev()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), render_reversed(v)))
                .collect();
            format!("{{{}}}", members.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_reversed).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}

proptest! {
    #[test]
    fn prop_canonicalize_is_idempotent(v in arb_json()) {
        let once = canonicalize(&v);
        let twice = canonicalize(&once);
        prop_assert_eq!(canonical_string(&once), canonical_string(&twice));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_key_order_does_not_affect_equality(v in arb_json()) {
        let reparsed: Value = serde_json::from_str(&render_reversed(&v)).unwrap();
        prop_assert!(canonical_eq(&v, &reparsed));
        prop_assert!(canonical_eq(&reparsed, &v));
    }

    #[test]
    fn prop_array_order_still_matters(a in any::<i64>(), b in any::<i64>()) {
        prop_assume!(a != b);
        let forward = Value::Array(vec![Value::from(a), Value::from(b)]);
        let backward = Value::Array(vec![Value::from(b), Value::from(a)]);
        prop_assert!(!canonical_eq(&forward, &backward));
    }
}
