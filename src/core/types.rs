use serde::Deserialize;
use std::fmt;

use crate::error::{TextSwapError, TextSwapResult};

/// An exact (pattern, replacement) substitution directive
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplacementRule {
    /// Human label used in reports, e.g. "First paragraph"
    #[serde(default)]
    pub name: Option<String>,
    /// Literal text block to look for; may span multiple lines
    pub pattern: String,
    /// Literal text block substituted for every occurrence of `pattern`
    pub replacement: String,
}

impl ReplacementRule {
    /// Create a new rule, rejecting an empty pattern
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> TextSwapResult<Self> {
        let rule = Self {
            name: None,
            pattern: pattern.into(),
            replacement: replacement.into(),
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Attach a report label
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// An empty pattern would match between every character
    pub fn validate(&self) -> TextSwapResult<()> {
        if self.pattern.is_empty() {
            return Err(TextSwapError::invalid_rule(format!(
                "{} has an empty pattern",
                self.name.as_deref().unwrap_or("rule")
            )));
        }
        Ok(())
    }

    /// Label for reports, falling back to the 1-based rule position
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("rule #{}", index + 1),
        }
    }
}

/// Outcome of applying one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStatus {
    /// Pattern found at least once and replaced
    Applied,
    /// Pattern absent; the document is unchanged by this rule
    NotFound,
}

/// Per-rule result, reported for every rule in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Position of the rule in the rule list (0-based)
    pub index: usize,
    pub label: String,
    pub status: RuleStatus,
    /// Occurrences replaced; 0 when not found
    pub count: usize,
}

impl RuleOutcome {
    pub fn is_applied(&self) -> bool {
        self.status == RuleStatus::Applied
    }
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            RuleStatus::Applied => write!(
                f,
                "✓ {} updated ({} occurrence{})",
                self.label,
                self.count,
                if self.count == 1 { "" } else { "s" }
            ),
            RuleStatus::NotFound => write!(f, "✗ {} not found", self.label),
        }
    }
}
