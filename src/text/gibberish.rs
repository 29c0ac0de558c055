/// Words whose presence proves the text has real label content.
const ANCHOR_WORDS: &[&str] = &[
    "and", "with", "sugar", "water", "oil", "acid", "soy", "salt", "flour", "milk", "egg",
    "corn", "syrup", "starch", "wheat", "flavor", "color", "natural", "sodium", "cocoa",
    "butter", "powder", "extract", "gum", "protein", "vitamin",
];

const MIN_ANCHOR_TOKEN_LEN: usize = 3;
const MIN_AVERAGE_TOKEN_LEN: f64 = 2.5;
const MIN_VOWEL_RATIO: f64 = 0.1;

/// Returns `true` when recognized text is too noisy to hold ingredient words.
///
/// Checks run in order: an anchor-word hit accepts immediately, then a short
/// average token length rejects, then a vowel-starved letter mix rejects.
/// Text without any alphabetic token is rejected.
pub fn is_gibberish(text: &str) -> bool {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return true;
    }

    let anchored = tokens.iter().any(|token| {
        token.chars().count() >= MIN_ANCHOR_TOKEN_LEN
            && ANCHOR_WORDS.iter().any(|anchor| token.contains(anchor))
    });
    if anchored {
        return false;
    }

    let letters: usize = tokens.iter().map(|t| t.chars().count()).sum();
    let average = letters as f64 / tokens.len() as f64;
    if average < MIN_AVERAGE_TOKEN_LEN {
        return true;
    }

    let vowels = tokens
        .iter()
        .flat_map(|t| t.chars())
        .filter(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
        .count();
    let consonants = letters - vowels;
    if consonants > 0 && (vowels as f64 / consonants as f64) < MIN_VOWEL_RATIO {
        return true;
    }

    false
}
