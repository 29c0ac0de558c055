use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::SafetyLabel;

const BUILTIN_RULES: &str = include_str!("../../data/rules.toml");

/// An exact-match override: lowercase name → fixed label and explanation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OverrideEntry {
    pub name: String,
    pub label: SafetyLabel,
    pub explanation: String,
}

/// A safe substring pattern and the explanation it yields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SafePattern {
    pub pattern: String,
    pub explanation: String,
}

/// Read-only classification tables, loaded once at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleTables {
    #[serde(default)]
    pub safe: Vec<OverrideEntry>,
    #[serde(default)]
    pub harmful: Vec<OverrideEntry>,
    #[serde(default)]
    pub controversial: Vec<OverrideEntry>,
    #[serde(default)]
    pub harmful_keywords: Vec<String>,
    #[serde(default)]
    pub controversial_keywords: Vec<String>,
    #[serde(default)]
    pub safe_patterns: Vec<SafePattern>,
}

impl RuleTables {
    /// Tables embedded in the binary from `data/rules.toml`.
    pub fn builtin() -> Result<Self> {
        toml::from_str(BUILTIN_RULES).context("built-in rule tables are malformed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_parse() {
        let tables = RuleTables::builtin().unwrap();
        assert!(tables.safe.iter().any(|e| e.name == "sugar"));
        assert!(tables.harmful.iter().all(|e| e.label == SafetyLabel::Harmful));
        assert!(tables
            .controversial
            .iter()
            .all(|e| e.label == SafetyLabel::Controversial));
        assert_eq!(tables.harmful_keywords.first().map(String::as_str), Some("hydrogenated"));
        assert_eq!(tables.safe_patterns.last().map(|p| p.pattern.as_str()), Some("citrate"));
    }

    #[test]
    fn test_safe_table_may_carry_other_labels() {
        let tables = RuleTables::builtin().unwrap();
        let palm = tables.safe.iter().find(|e| e.name == "palm oil").unwrap();
        assert_eq!(palm.label, SafetyLabel::Controversial);
    }

    #[test]
    fn test_partial_tables_default_missing_sections() {
        let tables: RuleTables = toml::from_str(
            r#"
harmful_keywords = ["nitrite"]

[[safe]]
name = "oats"
label = "not-harmful"
explanation = "Whole grain"
"#,
        )
        .unwrap();
        assert_eq!(tables.safe.len(), 1);
        assert_eq!(tables.safe[0].label, SafetyLabel::NotHarmful);
        assert!(tables.harmful.is_empty());
        assert_eq!(tables.harmful_keywords, vec!["nitrite"]);
    }
}
