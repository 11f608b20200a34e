//! Named-entry diff extraction for `content-differs` verdicts.
//!
//! Both bodies are read as Parameters documents. Each side is indexed
//! name → entry; when a name repeats, the later entry replaces the earlier
//! one but the name keeps the position of its first occurrence.
//! Bodies that are not Parameters-shaped contribute no entries.

use crate::canon::canonical_eq;
use crate::model::{DiffKind, ParamDiff};
use crate::params::{entries, entry_name};
use serde_json::Value;
use std::collections::HashMap;

/// Names in first-occurrence order plus the last entry seen for each.
struct EntryIndex<'a> {
    order: Vec<&'a str>,
    by_name: HashMap<&'a str, &'a Value>,
}

impl<'a> EntryIndex<'a> {
    fn build(body: &'a Value) -> Self {
        let mut order = Vec::new();
        let mut by_name = HashMap::new();
        for entry in entries(body) {
            let Some(name) = entry_name(entry) else {
                continue;
            };
            if by_name.insert(name, entry).is_none() {
                order.push(name);
            }
        }
        Self { order, by_name }
    }
}

/// Itemize entry-level differences between prod and dev.
///
/// Prod names come first in prod order (`missing-in-dev` or
/// `value-differs`), then dev-only names in dev order (`extra-in-dev`).
pub fn find_parameter_diffs(prod: &Value, dev: &Value) -> Vec<ParamDiff> {
    let prod_index = EntryIndex::build(prod);
    let dev_index = EntryIndex::build(dev);
    let mut diffs = Vec::new();

    for name in &prod_index.order {
        let prod_entry = prod_index.by_name[name];
        match dev_index.by_name.get(name) {
            None => diffs.push(ParamDiff {
                kind: DiffKind::MissingInDev,
                param: name.to_string(),
            }),
            Some(dev_entry) if !canonical_eq(prod_entry, dev_entry) => diffs.push(ParamDiff {
                kind: DiffKind::ValueDiffers,
                param: name.to_string(),
            }),
            Some(_) => {}
        }
    }

    for name in &dev_index.order {
        if !prod_index.by_name.contains_key(name) {
            diffs.push(ParamDiff {
                kind: DiffKind::ExtraInDev,
                param: name.to_string(),
            });
        }
    }

    diffs
}
