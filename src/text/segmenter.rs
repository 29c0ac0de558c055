use std::collections::HashSet;

use anyhow::Result;
use regex::Regex;

use crate::models::Candidate;

/// Separators folded into commas. Slash is left alone so slash-joined
/// compounds such as `glucose/fructose` stay whole.
const SECONDARY_SEPARATORS: &[&str] = &[";", "\n", "•", " and ", " & ", " or "];

const FILLER_WORDS: &[&str] = &["a", "an", "the", "of", "with", "and", "or", "but"];

/// Splits normalized text into ingredient candidates.
pub struct Segmenter {
    edge_junk: Regex,
    bare_percentage: Regex,
}

impl Segmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            edge_junk: Regex::new(r"^[\s,\-\.;:]+|[\s,\-\.;:]+$")?,
            bare_percentage: Regex::new(r"^\d+(?:\.\d+)?%$")?,
        })
    }

    pub fn segment(&self, text: &str) -> Vec<Candidate> {
        let mut joined = text.to_string();
        for separator in SECONDARY_SEPARATORS {
            joined = joined.replace(separator, ",");
        }

        let mut candidates = Vec::new();
        for (position, part) in joined.split(',').enumerate() {
            for piece in split_unbalanced_paren(part) {
                if let Some(kept) = self.filter_part(piece) {
                    candidates.push(Candidate::new(kept, position));
                }
            }
        }

        dedup_candidates(candidates)
    }

    fn filter_part(&self, part: &str) -> Option<String> {
        let part = self.edge_junk.replace_all(part.trim(), "");
        let part = part.trim();

        if self.bare_percentage.is_match(part) {
            return None;
        }
        if FILLER_WORDS.contains(&part.to_lowercase().as_str()) {
            return None;
        }
        if part.chars().count() < 2 {
            return None;
        }

        Some(part.to_string())
    }
}

/// Comma splitting cuts `colors (red 40, blue 1)` into `colors (red 40` and
/// `blue 1)`. Split the opener into outer and inner names, trim the closer.
fn split_unbalanced_paren(part: &str) -> Vec<&str> {
    let opens = part.matches('(').count();
    let closes = part.matches(')').count();

    if opens > closes {
        if let Some((outer, inner)) = part.split_once('(') {
            return vec![outer, inner.trim_end_matches(')')];
        }
    }
    if closes > opens {
        return vec![part.trim_matches(|c: char| c == ')' || c == '(' || c.is_whitespace())];
    }
    vec![part]
}

/// Case-insensitive dedup keeping first-seen casing and order.
///
/// Survivors must be longer than two characters, a stricter bound than the
/// `< 2` discard applied while filtering parts; two-character parts pass the
/// filter and still vanish here.
pub fn dedup_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| {
            let key = c.text.trim().to_lowercase();
            c.text.chars().count() > 2 && seen.insert(key)
        })
        .collect()
}
