use anyhow::Result;
use regex::{Captures, Regex};

/// Label boilerplate stripped when it opens the text or a list entry. A run
/// of several prefixes is stripped in one pass.
/// Longer forms come first so `ingredients` is not cut down to `s`.
const BOILERPLATE_PREFIXES: &[&str] = &[
    "contains",
    "ingredients",
    "ingredient",
    "made with",
    "made of",
    "composed of",
    "consists of",
    "including",
];

/// Weight, volume and packaging units removed together with their amount.
const UNITS: &[&str] = &[
    "milliliter",
    "milligram",
    "package",
    "ounce",
    "pound",
    "liter",
    "gram",
    "tbsp",
    "tsp",
    "cup",
    "can",
    "oz",
    "lb",
    "mg",
    "kg",
    "ml",
    "dl",
    "g",
    "l",
];

/// A number right after one of these is a color additive index (`red 40`).
const COLOR_NAMES: &[&str] = &["red", "yellow", "blue", "green"];

const MAX_PASSES: usize = 64;

/// Canonicalizes raw label text into a lowercase, comma-separated string.
pub struct Normalizer {
    hard_separators: Regex,
    prefixes: Regex,
    less_than: Regex,
    brackets: Regex,
    measurements: Regex,
    percentages: Regex,
    numbers: Regex,
    disallowed: Regex,
    comma_runs: Regex,
    whitespace: Regex,
}

impl Normalizer {
    pub fn new() -> Result<Self> {
        let prefixes = BOILERPLATE_PREFIXES
            .iter()
            .map(|p| regex::escape(p).replace(' ', r"\s+"))
            .collect::<Vec<_>>()
            .join("|");
        let units = UNITS.join("|");
        let colors = COLOR_NAMES.join("|");

        Ok(Self {
            hard_separators: Regex::new(r"[;\r\n•]")?,
            prefixes: Regex::new(&format!(
                r"(^|[,:(])\s*(?:(?:{prefixes})(?:\s*:\s*|\s+))+"
            ))?,
            less_than: Regex::new(
                r"(?:less\s+than\s*\d+(?:\.\d+)?\s*%|\d+(?:\.\d+)?\s*%\s*or\s+less)\s*of\b[:\s]*",
            )?,
            brackets: Regex::new(r"\[[^\]]*\]")?,
            measurements: Regex::new(&format!(r"\d+(?:\.\d+)?\s*(?:{units})s?\b"))?,
            percentages: Regex::new(r"\d+(?:\.\d+)?\s*%")?,
            numbers: Regex::new(&format!(r"\b(?:({colors})\s+)?\d+(?:\.\d+)?\b"))?,
            disallowed: Regex::new(r"[^\p{L}\p{N}\s,/&+()\-]")?,
            comma_runs: Regex::new(r"\s*,(?:\s*,)*\s*")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Normalize `text`. Repeats the rule sequence until the output is stable,
    /// so `normalize(normalize(x)) == normalize(x)`.
    pub fn normalize(&self, text: &str) -> String {
        let mut current = self.normalize_once(text);
        for _ in 0..MAX_PASSES {
            let next = self.normalize_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn normalize_once(&self, text: &str) -> String {
        let text = text.to_lowercase();
        let text = self.hard_separators.replace_all(&text, ",");
        let text = self.prefixes.replace_all(&text, "$1");
        let text = self.less_than.replace_all(&text, ",");
        let text = self.brackets.replace_all(&text, " ");
        let text = self.measurements.replace_all(&text, " ");
        let text = self.percentages.replace_all(&text, " ");
        let text = self.numbers.replace_all(&text, |caps: &Captures| {
            if caps.get(1).is_some() {
                caps[0].to_string()
            } else {
                " ".to_string()
            }
        });
        let text = self.disallowed.replace_all(&text, " ");
        let text = self.comma_runs.replace_all(&text, ", ");
        let text = self.whitespace.replace_all(&text, " ");

        text.trim_matches(|c: char| c == ',' || c.is_whitespace())
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        Normalizer::new().unwrap().normalize(text)
    }

    #[test]
    fn test_strips_label_boilerplate() {
        assert_eq!(
            normalize("INGREDIENTS: Water, Sugar, Salt."),
            "water, sugar, salt"
        );
        assert_eq!(normalize("Made of: flour; eggs"), "flour, eggs");
    }

    #[test]
    fn test_less_than_clause_becomes_boundary() {
        assert_eq!(
            normalize("sugar, palm oil; less than 2% of: citric acid, salt"),
            "sugar, palm oil, citric acid, salt"
        );
        assert_eq!(
            normalize("flour, contains 2% or less of salt"),
            "flour, salt"
        );
    }

    #[test]
    fn test_removes_amounts_and_annotations() {
        assert_eq!(
            normalize("flour 250g, milk 2 cups, butter [unsalted] 10%"),
            "flour, milk, butter"
        );
        assert_eq!(normalize("salt 1.5 mg, 12 eggs"), "salt, eggs");
    }

    #[test]
    fn test_keeps_color_additive_numbers() {
        assert_eq!(
            normalize("colors (red 40, yellow 5 lake), 7 grains"),
            "colors (red 40, yellow 5 lake), grains"
        );
    }

    #[test]
    fn test_keeps_compound_punctuation() {
        assert_eq!(
            normalize("Sugar/Glucose-Fructose, Salt & Pepper, A+B!"),
            "sugar/glucose-fructose, salt & pepper, a+b"
        );
    }

    #[test]
    fn test_repeated_prefixes_stripped_together() {
        assert_eq!(normalize(&("contains ".repeat(70) + "sugar")), "sugar");
        assert_eq!(normalize("ingredients contains: made of  oats"), "oats");
    }

    #[test]
    fn test_prefix_inside_a_name_is_kept() {
        assert_eq!(
            normalize("spices including pepper"),
            "spices including pepper"
        );
    }

    #[test]
    fn test_empty_and_noise_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  123 %% ;; "), "");
    }

    #[test]
    fn test_idempotent() {
        let n = Normalizer::new().unwrap();
        let repeated_prefix = "contains ".repeat(70) + "sugar";
        let repeated_with_numbers = "made with 5 ".repeat(70) + "salt";
        let samples = [
            "MADE OF: SUGAR, CORN SYRUP; LESS THAN 2% OF: CITRIC ACID, RED 40",
            "Ingredients:  contains: made with 5 2g flour,, ,salt • water\n(milk)",
            "contains contains contains ingredients: x",
            "made 5 of: sugar",
            "***sugar***, [note] 12% salt ;;; and & or",
            repeated_prefix.as_str(),
            repeated_with_numbers.as_str(),
        ];
        for sample in samples {
            let once = n.normalize(sample);
            assert_eq!(n.normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
