//! Captured request/response pair.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response metadata for one side of a capture.
///
/// Always present on a record, even when the body itself is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideMeta {
    pub status: u16,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub hash: String,
}

impl SideMeta {
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            content_type: "application/fhir+json".to_string(),
            size: 0,
            hash: String::new(),
        }
    }
}

/// One line of `comparison.ndjson`.
///
/// `prod_body`/`dev_body` are `None` when the capture has no body at all,
/// which is distinct from `Some("")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    pub id: String,
    pub url: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
    pub prod: SideMeta,
    pub dev: SideMeta,
    #[serde(default)]
    pub prod_body: Option<String>,
    #[serde(default)]
    pub dev_body: Option<String>,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub capture_match: Option<bool>,
}

impl ComparisonRecord {
    /// Parse the prod body as JSON, `None` when absent or unparsable.
    pub fn parsed_prod(&self) -> Option<Value> {
        parse_body(self.prod_body.as_deref())
    }

    /// Parse the dev body as JSON, `None` when absent or unparsable.
    pub fn parsed_dev(&self) -> Option<Value> {
        parse_body(self.dev_body.as_deref())
    }

    /// True when the capture stage already judged both bodies identical.
    pub fn matched_at_capture(&self) -> bool {
        self.capture_match == Some(true)
    }
}

/// Best-effort body parse.
///
/// A literal JSON `null` carries no document and is treated like a parse
/// failure.
pub fn parse_body(raw: Option<&str>) -> Option<Value> {
    let raw = raw?;
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Null) | Err(_) => None,
        Ok(value) => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_and_empty_bodies_are_distinct() {
        let line = json!({
            "id": "r1",
            "url": "/r4/CodeSystem/x",
            "method": "GET",
            "prod": {"status": 200, "contentType": "application/json", "size": 0, "hash": "h"},
            "dev": {"status": 200, "contentType": "application/json", "size": 0, "hash": "h"},
            "prodBody": ""
        });
        let record: ComparisonRecord = serde_json::from_value(line).unwrap();
        assert_eq!(record.prod_body.as_deref(), Some(""));
        assert_eq!(record.dev_body, None);
        assert_eq!(record.parsed_prod(), None);
        assert_eq!(record.parsed_dev(), None);
    }

    #[test]
    fn test_match_flag_is_optional() {
        let line = r#"{"id":"r2","url":"/r4/metadata","method":"GET",
            "prod":{"status":200},"dev":{"status":200},"match":true}"#;
        let record: ComparisonRecord = serde_json::from_str(line).unwrap();
        assert!(record.matched_at_capture());
        assert_eq!(record.prod.content_type, "");
    }

    #[test]
    fn test_parse_body_rejects_null_document() {
        assert_eq!(parse_body(Some("null")), None);
        assert_eq!(parse_body(Some("{")), None);
        assert_eq!(parse_body(Some("{\"a\":1}")), Some(json!({"a": 1})));
    }
}
