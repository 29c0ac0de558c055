use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::models::{Candidate, CleanedIngredient};
use crate::text::segmenter::dedup_candidates;

/// Allergy and packaging boilerplate that ends the ingredient part of a label.
const WARNING_KEYWORDS: &[&str] = &[
    "may contain",
    "tree nuts",
    "allergy",
    "allergen",
    "allergens",
    "warning",
    "contains",
    "product",
    "information",
    "packaged",
    "manufactured",
    "facility",
    "peanuts",
    "nuts",
];

/// Literal fixes for recognition errors. Short fragments are matched as
/// whole words on a space-padded candidate.
const RECOGNITION_CORRECTIONS: &[(&str, &str)] = &[
    (" who ", " whole "),
    (" ou ", " whole "),
    (" oya ", " soy "),
    (" ch ", " "),
    (" oo ", " "),
    (" q ", " "),
    ("artifical", "artificial"),
    ("flavour", "flavor"),
    ("~~", ""),
];

/// Multi-word names that are never split on a conjunction.
const KNOWN_COMPOUNDS: &[&str] = &[
    "dark chocolate",
    "milk chocolate",
    "white chocolate",
    "baking powder",
    "baking soda",
    "whole eggs",
    "egg whites",
    "egg yolks",
    "brown sugar",
    "cane sugar",
    "palm oil",
    "olive oil",
    "coconut oil",
    "soybean oil",
    "canola oil",
    "wheat flour",
    "all-purpose flour",
    "bread flour",
    "cake flour",
    "cocoa powder",
    "vanilla extract",
    "natural flavor",
    "artificial flavor",
    "chocolate chips",
    "chocolate chunk",
    "modified palm",
    "soya oil",
    "sodium bicarbonate",
    "glucose-fructose",
];

/// Two compounds the recognizer tends to run together without a separator.
/// Checked before `KNOWN_COMPOUNDS`, which would otherwise keep them joined.
const RUN_TOGETHER_COMPOUNDS: &[(&str, &str)] = &[("dark chocolate chunk", "chocolate chips")];

/// Second-pass cleanup for candidates recognized from an image.
pub struct PostProcessor {
    warning: Regex,
    symbols_only: Regex,
    page_marker: Regex,
    conjunction: Regex,
    whitespace: Regex,
}

impl PostProcessor {
    pub fn new() -> Result<Self> {
        let keywords = WARNING_KEYWORDS
            .iter()
            .map(|k| regex::escape(k).replace(' ', r"\s+"))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            warning: Regex::new(&format!(r"(?i)\b(?:{keywords})\b"))?,
            symbols_only: Regex::new(r"^[\d\W_]+$")?,
            page_marker: Regex::new(r"(?i)^[pq]\d+$")?,
            conjunction: Regex::new(r"(?i)\s+(?:and|or)\s+")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    pub fn clean(&self, candidates: &[Candidate]) -> Vec<CleanedIngredient> {
        let mut cleaned = Vec::new();

        for candidate in candidates {
            for name in self.clean_one(&candidate.text) {
                cleaned.push(Candidate::new(name, candidate.position));
            }
        }

        dedup_candidates(cleaned)
            .into_iter()
            .map(|c| CleanedIngredient { name: c.text })
            .collect()
    }

    fn clean_one(&self, text: &str) -> Vec<String> {
        if self.is_not_ingredient(text) {
            debug!(candidate = text, "dropped as non-ingredient");
            return Vec::new();
        }

        let fixed = self.fix_recognition_errors(text);
        let truncated = self.truncate_at_warning(&fixed);
        if truncated.chars().count() < 2 {
            return Vec::new();
        }

        split_compound(truncated, &self.conjunction)
            .into_iter()
            .filter(|part| part.chars().count() > 2)
            .collect()
    }

    /// Too short, led by warning boilerplate, symbols only, or a page marker.
    fn is_not_ingredient(&self, text: &str) -> bool {
        let text = text.trim();
        if text.chars().count() < 2 {
            return true;
        }
        if self.warning.find(text).is_some_and(|m| m.start() == 0) {
            return true;
        }
        self.symbols_only.is_match(text) || self.page_marker.is_match(text)
    }

    fn fix_recognition_errors(&self, text: &str) -> String {
        let mut padded = format!(" {text} ");
        for (wrong, right) in RECOGNITION_CORRECTIONS {
            // Adjacent padded matches share a space, so one pass can miss one.
            while padded.contains(wrong) {
                padded = padded.replace(wrong, right);
            }
        }
        self.whitespace.replace_all(padded.trim(), " ").into_owned()
    }

    /// Cut at the first warning keyword found after the start.
    fn truncate_at_warning<'a>(&self, text: &'a str) -> &'a str {
        match self.warning.find(text) {
            Some(m) => text[..m.start()].trim(),
            None => text.trim(),
        }
    }
}

fn split_compound(text: &str, conjunction: &Regex) -> Vec<String> {
    let lower = text.to_lowercase();

    for (first, second) in RUN_TOGETHER_COMPOUNDS {
        if lower.contains(first) && lower.contains(second) {
            return vec![first.to_string(), second.to_string()];
        }
    }

    if KNOWN_COMPOUNDS.iter().any(|compound| lower.contains(compound)) {
        return vec![text.to_string()];
    }

    if lower.contains(" and ") || lower.contains(" or ") {
        return conjunction
            .split(text)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
    }

    // Slash-joined names such as `sugar/glucose-fructose` stay whole.
    vec![text.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(texts: &[&str]) -> Vec<String> {
        let candidates: Vec<Candidate> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Candidate::new(*t, i))
            .collect();
        PostProcessor::new()
            .unwrap()
            .clean(&candidates)
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    #[test]
    fn test_drops_warning_led_and_junk_candidates() {
        let out = clean(&[
            "may contain peanuts",
            "allergy advice",
            "p12",
            "123-45",
            "x",
            "flour",
        ]);
        assert_eq!(out, vec!["flour"]);
    }

    #[test]
    fn test_truncates_at_mid_string_warning() {
        let out = clean(&["sugar may contain traces of nuts", "coconuts"]);
        assert_eq!(out, vec!["sugar", "coconuts"]);
    }

    #[test]
    fn test_applies_recognition_corrections() {
        let out = clean(&["ou wheat flour", "oya lecithin", "artifical flavour"]);
        assert_eq!(
            out,
            vec!["whole wheat flour", "soy lecithin", "artificial flavor"]
        );
    }

    #[test]
    fn test_corrections_catch_adjacent_fragments() {
        let out = clean(&["wheat ch ch flour", "q q oo cocoa"]);
        assert_eq!(out, vec!["wheat flour", "cocoa"]);
    }

    #[test]
    fn test_run_together_compounds_split_exactly_in_two() {
        let out = clean(&["dark chocolate chunk chocolate chips"]);
        assert_eq!(out, vec!["dark chocolate chunk", "chocolate chips"]);
    }

    #[test]
    fn test_known_compound_is_not_split() {
        let out = clean(&["baking powder", "dark chocolate and cream"]);
        assert_eq!(out, vec!["baking powder", "dark chocolate and cream"]);
    }

    #[test]
    fn test_conjunction_split_and_slash_kept() {
        let out = clean(&[
            "salt or sea salt",
            "sugar/glucose-fructose",
            "canola and/or soy oil",
        ]);
        assert_eq!(
            out,
            vec!["salt", "sea salt", "sugar/glucose-fructose", "canola and/or soy oil"]
        );
    }

    #[test]
    fn test_re_dedup_after_split() {
        let out = clean(&["Salt", "salt and pepper", "PEPPER"]);
        assert_eq!(out, vec!["Salt", "pepper"]);
    }
}
