//! Data-driven tolerance rules.
//!
//! A [`DeclarativeRule`] pairs a [`Matcher`] (every given condition must
//! hold) with an action. Normalizing rules apply an ordered list of
//! [`Transform`]s to both bodies.

use crate::errors::{Result, TxCompareError};
use crate::model::{ComparisonRecord, RuleKind};
use crate::params::{entries, entry_name, entry_sort_value, is_parameters};
use crate::tolerance::{ComparisonContext, NormalizedBodies, RuleAction, ToleranceRule};
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Record predicate. An empty matcher matches every record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Matcher {
    pub url_contains: Option<String>,
    #[serde(default)]
    pub url_ends_with: Vec<String>,
    #[serde(default)]
    pub url_equals: Vec<String>,
    pub method: Option<String>,
    pub prod_status: Option<u16>,
    pub dev_status: Option<u16>,
    /// Raw prod body starts with this text after leading whitespace.
    pub prod_body_starts_with: Option<String>,
    /// Either working body has this `resourceType`.
    pub resource_type: Option<String>,
    /// Whether either working body is Parameters-shaped.
    pub parameters: Option<bool>,
    /// Either working body has a parameter entry with this name.
    pub has_param: Option<String>,
    /// Prod body is an OperationOutcome with an issue of this code.
    pub prod_issue_code: Option<String>,
}

impl Matcher {
    pub fn matches(&self, ctx: &ComparisonContext<'_>) -> bool {
        let record = ctx.record;
        let either = |pred: &dyn Fn(&Value) -> bool| {
            ctx.prod.as_ref().map(pred).unwrap_or(false)
                || ctx.dev.as_ref().map(pred).unwrap_or(false)
        };

        if let Some(needle) = &self.url_contains {
            if !record.url.contains(needle.as_str()) {
                return false;
            }
        }
        if !self.url_ends_with.is_empty()
            && !self
                .url_ends_with
                .iter()
                .any(|suffix| record.url.ends_with(suffix.as_str()))
        {
            return false;
        }
        if !self.url_equals.is_empty() && !self.url_equals.iter().any(|u| u == &record.url) {
            return false;
        }
        if let Some(method) = &self.method {
            if !record.method.eq_ignore_ascii_case(method) {
                return false;
            }
        }
        if self.prod_status.is_some_and(|s| s != record.prod.status) {
            return false;
        }
        if self.dev_status.is_some_and(|s| s != record.dev.status) {
            return false;
        }
        if let Some(prefix) = &self.prod_body_starts_with {
            let starts = record
                .prod_body
                .as_deref()
                .map(|body| body.trim_start().starts_with(prefix.as_str()))
                .unwrap_or(false);
            if !starts {
                return false;
            }
        }
        if let Some(resource_type) = &self.resource_type {
            if !either(&|body: &Value| {
                body.get("resourceType").and_then(Value::as_str) == Some(resource_type.as_str())
            }) {
                return false;
            }
        }
        if let Some(wanted) = self.parameters {
            if either(&is_parameters) != wanted {
                return false;
            }
        }
        if let Some(name) = &self.has_param {
            if !either(&|body: &Value| {
                entries(body)
                    .iter()
                    .any(|entry| entry_name(entry) == Some(name.as_str()))
            }) {
                return false;
            }
        }
        if let Some(code) = &self.prod_issue_code {
            if !ctx
                .prod
                .as_ref()
                .map(|body| has_issue_code(body, code))
                .unwrap_or(false)
            {
                return false;
            }
        }
        true
    }
}

fn has_issue_code(body: &Value, code: &str) -> bool {
    body.get("resourceType").and_then(Value::as_str) == Some("OperationOutcome")
        && body
            .get("issue")
            .and_then(Value::as_array)
            .map(|issues| {
                issues
                    .iter()
                    .any(|issue| issue.get("code").and_then(Value::as_str) == Some(code))
            })
            .unwrap_or(false)
}

/// Body rewrite applied identically to prod and dev.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Transform {
    /// Drop parameter entries with any of these names.
    StripParams { names: Vec<String> },
    /// Sort parameter entries by name, then by first `value*` as text.
    SortParamsByName,
    /// Remove fields at dotted paths; arrays on the way fan out.
    StripFields { paths: Vec<String> },
    /// Sort the array at a dotted path by the given element keys.
    SortArray { path: String, keys: Vec<String> },
}

impl Transform {
    pub fn apply(&self, body: Value) -> Value {
        match self {
            Transform::StripParams { names } => strip_params(body, names),
            Transform::SortParamsByName => sort_params_by_name(body),
            Transform::StripFields { paths } => {
                let mut body = body;
                for path in paths {
                    let segments: Vec<&str> = path.split('.').collect();
                    strip_path(&mut body, &segments);
                }
                body
            }
            Transform::SortArray { path, keys } => {
                let mut body = body;
                let segments: Vec<&str> = path.split('.').collect();
                sort_array_at(&mut body, &segments, keys);
                body
            }
        }
    }

    fn validate(&self, rule_id: &str) -> Result<()> {
        let invalid = |reason: &str| {
            Err(TxCompareError::InvalidRuleSet {
                reason: format!("rule {}: {}", rule_id, reason),
            })
        };
        match self {
            Transform::StripParams { names } if names.is_empty() => {
                invalid("strip-params needs at least one name")
            }
            Transform::StripFields { paths } if paths.iter().any(|p| p.is_empty()) => {
                invalid("strip-fields paths must be non-empty")
            }
            Transform::SortArray { path, .. } if path.is_empty() => {
                invalid("sort-array path must be non-empty")
            }
            Transform::SortArray { keys, .. } if keys.is_empty() => {
                invalid("sort-array needs at least one key")
            }
            _ => Ok(()),
        }
    }
}

fn strip_params(mut body: Value, names: &[String]) -> Value {
    if let Some(params) = body.get_mut("parameter").and_then(Value::as_array_mut) {
        params.retain(|entry| {
            entry_name(entry)
                .map(|name| !names.iter().any(|n| n == name))
                .unwrap_or(true)
        });
    }
    body
}

fn sort_params_by_name(mut body: Value) -> Value {
    if let Some(params) = body.get_mut("parameter").and_then(Value::as_array_mut) {
        params.sort_by(|a, b| {
            entry_name(a)
                .unwrap_or("")
                .cmp(entry_name(b).unwrap_or(""))
                .then_with(|| entry_sort_value(a).cmp(&entry_sort_value(b)))
        });
    }
    body
}

fn strip_path(value: &mut Value, segments: &[&str]) {
    match value {
        Value::Array(items) => {
            for item in items {
                strip_path(item, segments);
            }
        }
        Value::Object(map) => match segments {
            [] => {}
            [last] => {
                map.remove(*last);
            }
            [head, rest @ ..] => {
                if let Some(child) = map.get_mut(*head) {
                    strip_path(child, rest);
                }
            }
        },
        _ => {}
    }
}

fn sort_array_at(value: &mut Value, segments: &[&str], keys: &[String]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    let Some(child) = value.get_mut(*head) else {
        return;
    };
    if !rest.is_empty() {
        sort_array_at(child, rest, keys);
        return;
    }
    if let Some(items) = child.as_array_mut() {
        items.sort_by(|a, b| compare_by_keys(a, b, keys));
    }
}

fn compare_by_keys(a: &Value, b: &Value, keys: &[String]) -> Ordering {
    for key in keys {
        let ord = key_text(a, key).cmp(&key_text(b, key));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn key_text(item: &Value, key: &str) -> String {
    match item.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Whether a declarative rule skips or normalizes when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionDef {
    Skip,
    Normalize,
}

/// A tolerance rule defined entirely by data.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarativeRule {
    pub id: String,
    pub kind: RuleKind,
    pub description: Option<String>,
    pub bug_id: Option<String>,
    pub action: ActionDef,
    pub when: Matcher,
    pub transforms: Vec<Transform>,
}

impl DeclarativeRule {
    /// A skip rule.
    pub fn skip(id: impl Into<String>, kind: RuleKind, when: Matcher) -> Self {
        Self {
            id: id.into(),
            kind,
            description: None,
            bug_id: None,
            action: ActionDef::Skip,
            when,
            transforms: Vec::new(),
        }
    }

    /// A normalize rule.
    pub fn normalize(
        id: impl Into<String>,
        kind: RuleKind,
        when: Matcher,
        transforms: Vec<Transform>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            description: None,
            bug_id: None,
            action: ActionDef::Normalize,
            when,
            transforms,
        }
    }

    /// Check the definition is usable.
    ///
    /// # Errors
    ///
    /// `InvalidRuleSet` for an empty id, a normalize rule without
    /// transforms, a skip rule with transforms, or a malformed transform.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(TxCompareError::InvalidRuleSet {
                reason: "rule id must be non-empty".to_string(),
            });
        }
        match self.action {
            ActionDef::Normalize if self.transforms.is_empty() => {
                return Err(TxCompareError::InvalidRuleSet {
                    reason: format!("rule {}: normalize needs at least one transform", self.id),
                });
            }
            ActionDef::Skip if !self.transforms.is_empty() => {
                return Err(TxCompareError::InvalidRuleSet {
                    reason: format!("rule {}: skip rules take no transforms", self.id),
                });
            }
            _ => {}
        }
        for transform in &self.transforms {
            transform.validate(&self.id)?;
        }
        Ok(())
    }
}

impl ToleranceRule for DeclarativeRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> RuleKind {
        self.kind
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn bug_id(&self) -> Option<&str> {
        self.bug_id.as_deref()
    }

    fn evaluate(&self, ctx: &ComparisonContext<'_>) -> Result<RuleAction> {
        if !self.when.matches(ctx) {
            return Ok(RuleAction::None);
        }
        Ok(match self.action {
            ActionDef::Skip => RuleAction::Skip,
            ActionDef::Normalize => RuleAction::Normalize,
        })
    }

    fn normalize(
        &self,
        _record: &ComparisonRecord,
        prod: &Value,
        dev: &Value,
    ) -> Result<NormalizedBodies> {
        let run = |body: &Value| {
            self.transforms
                .iter()
                .fold(body.clone(), |acc, transform| transform.apply(acc))
        };
        Ok(NormalizedBodies {
            prod: run(prod),
            dev: run(dev),
        })
    }
}
