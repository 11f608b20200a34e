//! Rule-file loading.
//!
//! A job's `tolerances.toml` lists `[[rule]]` tables in application order:
//!
//! ```toml
//! [[rule]]
//! id = "skip-metadata-ops"
//! kind = "equiv-autofix"
//! action = "skip"
//! when = { url_contains = "/metadata" }
//!
//! [[rule]]
//! id = "strip-diagnostics"
//! kind = "equiv-autofix"
//! action = "normalize"
//! when = { parameters = true }
//! transform = [{ op = "strip-params", names = ["diagnostics"] }]
//! ```

use crate::errors::Result;
use crate::model::RuleKind;
use crate::tolerance::declarative::{ActionDef, DeclarativeRule, Matcher, Transform};
use crate::tolerance::{RuleSet, ToleranceRule};
use serde::Deserialize;

/// Top-level rule file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleFile {
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleDef>,
}

/// One `[[rule]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDef {
    pub id: String,
    #[serde(default)]
    pub kind: RuleKind,
    pub description: Option<String>,
    pub bug_id: Option<String>,
    pub action: ActionDef,
    #[serde(default)]
    pub when: Matcher,
    #[serde(default, rename = "transform")]
    pub transforms: Vec<Transform>,
}

impl From<RuleDef> for DeclarativeRule {
    fn from(def: RuleDef) -> Self {
        DeclarativeRule {
            id: def.id,
            kind: def.kind,
            description: def.description,
            bug_id: def.bug_id,
            action: def.action,
            when: def.when,
            transforms: def.transforms,
        }
    }
}

impl RuleFile {
    /// Validate every rule and build the ordered rule set.
    ///
    /// # Errors
    ///
    /// `InvalidRuleSet` for a malformed rule, `DuplicateRuleId` when ids
    /// collide.
    pub fn into_rule_set(self) -> Result<RuleSet> {
        let mut rules: Vec<Box<dyn ToleranceRule>> = Vec::with_capacity(self.rules.len());
        for def in self.rules {
            let rule = DeclarativeRule::from(def);
            rule.validate()?;
            rules.push(Box::new(rule));
        }
        RuleSet::new(rules)
    }
}

/// Parse TOML rule-file text into a rule set.
///
/// # Errors
///
/// `InvalidRuleSet` for TOML or schema errors, plus everything
/// [`RuleFile::into_rule_set`] rejects.
pub fn load_rule_set_str(text: &str) -> Result<RuleSet> {
    let file: RuleFile = toml::from_str(text)?;
    file.into_rule_set()
}
