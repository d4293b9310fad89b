//! Structural linting of serialized documents.
//!
//! The adapter feeds a fixed rule set to a recursive-descent selector
//! walker and reports one diagnostic per violating node. Diagnostics are
//! advisory: they never mutate the document.

use crate::error::{OpenApiError, OpenApiResult};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// One structural-lint finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub rule: String,
    pub message: String,
    /// Locator of the violating node within the document.
    pub at: String,
}

/// What a selected node must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assertion {
    /// Non-null, non-false, non-empty-string.
    Truthy,
}

impl Assertion {
    fn holds(&self, value: &JsonValue) -> bool {
        match self {
            Assertion::Truthy => match value {
                JsonValue::Null => false,
                JsonValue::Bool(flag) => *flag,
                JsonValue::String(text) => !text.is_empty(),
                JsonValue::Number(number) => number.as_f64() != Some(0.0),
                JsonValue::Array(_) | JsonValue::Object(_) => true,
            },
        }
    }
}

/// A named selector/assertion pair. The selector grammar is the
/// recursive-descent field form `$..field`: every node reachable under a key
/// named `field`, at any depth.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub selector: String,
    pub message: String,
    pub assert: Assertion,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        selector: impl Into<String>,
        message: impl Into<String>,
        assert: Assertion,
    ) -> Self {
        Self {
            id: id.into(),
            selector: selector.into(),
            message: message.into(),
            assert,
        }
    }
}

/// Thin adapter over the rule evaluator.
#[derive(Debug, Clone)]
pub struct Linter {
    rules: Vec<Rule>,
}

impl Default for Linter {
    /// The fixed default rule set: every `description` field must be
    /// non-empty.
    fn default() -> Self {
        Self::with_rules(vec![Rule::new(
            "no-empty-description",
            "$..description",
            "Description must not be empty",
            Assertion::Truthy,
        )])
    }
}

impl Linter {
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Evaluate every rule against a serialized YAML document.
    pub fn lint(&self, serialized: &str) -> OpenApiResult<Vec<Diagnostic>> {
        let document: JsonValue = serde_yaml::from_str(serialized)?;
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            let field = rule
                .selector
                .strip_prefix("$..")
                .filter(|field| !field.is_empty())
                .ok_or_else(|| OpenApiError::UnsupportedSelector(rule.selector.clone()))?;
            let mut hits = Vec::new();
            collect(&document, field, "$", &mut hits);
            for (at, value) in hits {
                if !rule.assert.holds(value) {
                    diagnostics.push(Diagnostic {
                        rule: rule.id.clone(),
                        message: rule.message.clone(),
                        at,
                    });
                }
            }
        }
        Ok(diagnostics)
    }
}

fn collect<'a>(
    node: &'a JsonValue,
    field: &str,
    at: &str,
    hits: &mut Vec<(String, &'a JsonValue)>,
) {
    match node {
        JsonValue::Object(map) => {
            for (key, value) in map {
                let child = format!("{at}.{key}");
                if key == field {
                    hits.push((child.clone(), value));
                }
                collect(value, field, &child, hits);
            }
        }
        JsonValue::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                collect(value, field, &format!("{at}[{index}]"), hits);
            }
        }
        _ => {}
    }
}
