//! Operation classifier.
//!
//! Maps a request URL to a coarse operation tag. Markers are tested in a
//! fixed order and the first hit wins.

use serde::{Deserialize, Serialize};

/// Coarse classification of a request's semantic action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    ValidateCode,
    BatchValidateCode,
    Expand,
    Lookup,
    Subsumes,
    Translate,
    Metadata,
    Read,
    Other,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ValidateCode => "validate-code",
            Operation::BatchValidateCode => "batch-validate-code",
            Operation::Expand => "expand",
            Operation::Lookup => "lookup",
            Operation::Subsumes => "subsumes",
            Operation::Translate => "translate",
            Operation::Metadata => "metadata",
            Operation::Read => "read",
            Operation::Other => "other",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substring markers in priority order.
const MARKERS: &[(&str, Operation)] = &[
    ("$validate-code", Operation::ValidateCode),
    ("$batch-validate-code", Operation::BatchValidateCode),
    ("$expand", Operation::Expand),
    ("$lookup", Operation::Lookup),
    ("$subsumes", Operation::Subsumes),
    ("$translate", Operation::Translate),
    ("/metadata", Operation::Metadata),
];

/// Resource types whose plain path denotes a read.
const READ_RESOURCE_TYPES: &[&str] = &["CodeSystem", "ValueSet", "ConceptMap"];

/// Classify a request URL.
pub fn classify_operation(url: &str) -> Operation {
    let base = url.split('?').next().unwrap_or(url);

    for (marker, op) in MARKERS {
        if base.contains(marker) {
            return *op;
        }
    }

    if is_resource_read(base) {
        return Operation::Read;
    }

    Operation::Other
}

/// `/<Type>/` or `/<Type>` at the end of the path.
fn is_resource_read(path: &str) -> bool {
    READ_RESOURCE_TYPES.iter().any(|resource_type| {
        let needle = format!("/{}", resource_type);
        path.match_indices(&needle).any(|(idx, _)| {
            let rest = &path[idx + needle.len()..];
            rest.is_empty() || rest.starts_with('/')
        })
    })
}
