use std::collections::HashMap;

use tracing::{debug, warn};

use crate::classify::model::{ModelError, SafetyModel};
use crate::classify::rules::DecisionList;
use crate::classify::tables::{OverrideEntry, RuleTables};
use crate::models::{ClassificationResult, DecisionSource, OverrideTable, SafetyLabel};

const DEFAULT_EXPLANATION: &str = "Assumed safe unless known to be harmful";

/// Classifies single ingredients through a strict-priority decision cascade:
///
/// 1. exact override (safe → harmful → controversial table)
/// 2. harmful keyword containment
/// 3. controversial keyword containment
/// 4. safe pattern containment
/// 5. statistical model, when one is loaded
/// 6. default: Not Harmful
///
/// Built once at startup and shared by reference; nothing here mutates after
/// construction.
pub struct IngredientClassifier {
    overrides: [(OverrideTable, HashMap<String, OverrideEntry>); 3],
    harmful_keywords: DecisionList<SafetyLabel>,
    controversial_keywords: DecisionList<SafetyLabel>,
    safe_patterns: DecisionList<String>,
    model: Option<Box<dyn SafetyModel>>,
}

impl IngredientClassifier {
    pub fn new(tables: RuleTables) -> Self {
        let RuleTables {
            safe,
            harmful,
            controversial,
            harmful_keywords,
            controversial_keywords,
            safe_patterns,
        } = tables;

        let overrides = [
            (OverrideTable::Safe, index_overrides(safe)),
            (OverrideTable::Harmful, index_overrides(harmful)),
            (OverrideTable::Controversial, index_overrides(controversial)),
        ];
        warn_on_overlap(&overrides);

        let harmful_keywords =
            DecisionList::new(harmful_keywords.into_iter().map(|k| (k, SafetyLabel::Harmful)));
        let controversial_keywords = DecisionList::new(
            controversial_keywords
                .into_iter()
                .map(|k| (k, SafetyLabel::Controversial)),
        );
        let safe_patterns =
            DecisionList::new(safe_patterns.into_iter().map(|p| (p.pattern, p.explanation)));

        debug!(
            overrides = overrides.iter().map(|(_, entries)| entries.len()).sum::<usize>(),
            harmful_keywords = harmful_keywords.len(),
            controversial_keywords = controversial_keywords.len(),
            safe_patterns = safe_patterns.len(),
            "rule tables loaded"
        );

        Self {
            overrides,
            harmful_keywords,
            controversial_keywords,
            safe_patterns,
            model: None,
        }
    }

    pub fn with_model(mut self, model: Box<dyn SafetyModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Label one ingredient. Total: every input gets exactly one label.
    pub fn classify(&self, ingredient: &str) -> ClassificationResult {
        let name = ingredient.trim();
        let key = name.to_lowercase();

        let decide = |label: SafetyLabel, explanation: String, source: DecisionSource| {
            debug!(ingredient = name, %label, %source, "classified");
            ClassificationResult {
                ingredient: name.to_string(),
                label,
                explanation,
                source,
            }
        };

        for (table, entries) in &self.overrides {
            if let Some(entry) = entries.get(&key) {
                return decide(
                    entry.label,
                    entry.explanation.clone(),
                    DecisionSource::ExactOverride(*table),
                );
            }
        }

        if let Some((keyword, label)) = self.harmful_keywords.first_match(&key) {
            return decide(
                *label,
                format!("Contains {keyword} - potential health risk"),
                DecisionSource::HarmfulKeyword,
            );
        }

        if let Some((keyword, label)) = self.controversial_keywords.first_match(&key) {
            return decide(
                *label,
                format!("Contains {keyword} - mixed safety reviews"),
                DecisionSource::ControversialKeyword,
            );
        }

        if let Some((_, explanation)) = self.safe_patterns.first_match(&key) {
            return decide(
                SafetyLabel::NotHarmful,
                explanation.clone(),
                DecisionSource::SafePattern,
            );
        }

        if let Some(model) = &self.model {
            let predicted = model.predict(name).and_then(|class_id| {
                SafetyLabel::from_class_id(class_id).ok_or(ModelError::ClassOutOfRange(class_id))
            });
            match predicted {
                Ok(label) => {
                    return decide(
                        label,
                        label.generic_explanation().to_string(),
                        DecisionSource::Model,
                    );
                }
                Err(e) => warn!(ingredient = name, error = %e, "model made no decision"),
            }
        }

        decide(
            SafetyLabel::NotHarmful,
            DEFAULT_EXPLANATION.to_string(),
            DecisionSource::Default,
        )
    }

    /// Classify in input order, skipping blank entries.
    pub fn classify_all<S: AsRef<str>>(&self, ingredients: &[S]) -> Vec<ClassificationResult> {
        ingredients
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !name.trim().is_empty())
            .map(|name| self.classify(name))
            .collect()
    }
}

/// Key by lowercase trimmed name; the first entry for a name wins.
fn index_overrides(entries: Vec<OverrideEntry>) -> HashMap<String, OverrideEntry> {
    let mut index = HashMap::new();
    for entry in entries {
        index
            .entry(entry.name.trim().to_lowercase())
            .or_insert(entry);
    }
    index
}

fn warn_on_overlap(overrides: &[(OverrideTable, HashMap<String, OverrideEntry>); 3]) {
    for (i, (first_table, first)) in overrides.iter().enumerate() {
        for (second_table, second) in &overrides[i + 1..] {
            for name in first.keys().filter(|name| second.contains_key(*name)) {
                warn!(
                    name = name.as_str(),
                    winner = ?first_table,
                    shadowed = ?second_table,
                    "override listed in more than one table"
                );
            }
        }
    }
}
