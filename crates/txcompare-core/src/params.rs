//! Helpers for `Parameters`-shaped documents.
//!
//! A Parameters document is an object carrying an ordered `parameter` list
//! of `{ "name": ..., "value[x]" | "resource" | "part": ... }` entries.

use serde_json::Value;

/// True when the document is a Parameters resource or carries a
/// `parameter` array.
pub fn is_parameters(body: &Value) -> bool {
    body.get("resourceType").and_then(Value::as_str) == Some("Parameters")
        || body.get("parameter").map(Value::is_array).unwrap_or(false)
}

/// The `parameter` entries, empty when the body is not Parameters-shaped.
pub fn entries(body: &Value) -> &[Value] {
    body.get("parameter")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Name of an entry, when it has a string `name`.
pub fn entry_name(entry: &Value) -> Option<&str> {
    entry.get("name").and_then(Value::as_str)
}

/// Typed value of the first entry named `name`.
///
/// The value is the entry's `value*` field, falling back to its embedded
/// `resource`. Object keys are sorted, so an entry with several `value*`
/// fields yields the alphabetically first. `None` when the body is not
/// Parameters-shaped, the entry is missing, or it carries no value.
pub fn param_value<'a>(body: &'a Value, name: &str) -> Option<&'a Value> {
    let entry = entries(body)
        .iter()
        .find(|entry| entry_name(entry) == Some(name))?;
    let fields = entry.as_object()?;
    fields
        .iter()
        .find(|(key, _)| key.starts_with("value"))
        .map(|(_, value)| value)
        .or_else(|| fields.get("resource"))
}

/// Tiebreak key for entries sharing a name: the first `value*` field,
/// rendered as text.
pub fn entry_sort_value(entry: &Value) -> String {
    let Some(fields) = entry.as_object() else {
        return String::new();
    };
    fields
        .iter()
        .find(|(key, _)| key.starts_with("value"))
        .map(|(_, value)| match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

/// Injected accessor used by the categorizer to read typed parameter values.
pub trait ParamAccessor: Send + Sync {
    fn value<'a>(&self, body: &'a Value, name: &str) -> Option<&'a Value>;
}

/// Accessor for FHIR `Parameters` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParametersAccessor;

impl ParamAccessor for ParametersAccessor {
    fn value<'a>(&self, body: &'a Value, name: &str) -> Option<&'a Value> {
        param_value(body, name)
    }
}

/// Loose truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> Value {
        json!({
            "resourceType": "Parameters",
            "parameter": [
                {"name": "result", "valueBoolean": true},
                {"name": "system", "valueUri": "http://x"},
                {"name": "issues", "resource": {"resourceType": "OperationOutcome"}},
                {"name": "result", "valueBoolean": false}
            ]
        })
    }

    #[test]
    fn test_first_entry_wins() {
        assert_eq!(param_value(&params(), "result"), Some(&json!(true)));
    }

    #[test]
    fn test_resource_is_a_value() {
        assert_eq!(
            param_value(&params(), "issues"),
            Some(&json!({"resourceType": "OperationOutcome"}))
        );
    }

    #[test]
    fn test_value_field_preferred_over_resource() {
        let body = json!({
            "parameter": [{
                "name": "match",
                "resource": {"resourceType": "Coding"},
                "valueString": "exact"
            }]
        });
        assert_eq!(param_value(&body, "match"), Some(&json!("exact")));
    }

    #[test]
    fn test_non_parameters_body_has_no_values() {
        let vs = json!({"resourceType": "ValueSet", "id": "x"});
        assert!(!is_parameters(&vs));
        assert_eq!(param_value(&vs, "result"), None);
        assert!(entries(&vs).is_empty());
    }

    #[test]
    fn test_entry_without_value() {
        let body = json!({"parameter": [{"name": "match", "part": []}]});
        assert!(is_parameters(&body));
        assert_eq!(param_value(&body, "match"), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!("A")));
    }
}
