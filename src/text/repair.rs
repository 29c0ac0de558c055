//! Whole-text repairs for recognized label text, applied before normalization.

use tracing::debug;

/// Garbles the recognizer produces on common label words, in application order.
const GARBLE_REPAIRS: &[(&str, &str)] = &[
    ("gorn", "corn"),
    ("tap ioga", "tapioca"),
    ("tapioga", "tapioca"),
    ("st argh", "starch"),
    ("stargh", "starch"),
    ("artif igial", "artificial"),
    ("artifigial", "artificial"),
    ("nat ural", "natural"),
];

/// Lowercase recognized text, optionally drop the label header up to the
/// first colon (`"INGREDIENTS:"`, `"MADE OF:"`), and fix known garbles.
pub fn repair_recognized(text: &str, strip_header: bool) -> String {
    let mut text = text.to_lowercase();

    if strip_header {
        // A colon after list content ("..., less than 2% of:") is not a header.
        let header_end = text
            .split_once(':')
            .filter(|(header, _)| !header.contains(|c: char| c == ',' || c == ';'))
            .map(|(header, _)| header.len() + 1);
        if let Some(end) = header_end {
            debug!(header = text[..end].trim(), "dropping label header");
            text.drain(..end);
        }
    }

    for (wrong, right) in GARBLE_REPAIRS {
        if text.contains(wrong) {
            text = text.replace(wrong, right);
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repairs_known_garbles() {
        let fixed = repair_recognized(
            "MADE OF: SUGAR, GORN SYRUP, TAPIOGA DEXTRIN, MODIFIED CORN STARGH, NATURAL AND ARTIFIGIAL FLAVORS",
            true,
        );
        assert_eq!(
            fixed,
            " sugar, corn syrup, tapioca dextrin, modified corn starch, natural and artificial flavors"
        );
    }

    #[test]
    fn test_header_kept_when_disabled_or_absent() {
        assert_eq!(repair_recognized("Salt: fine", false), "salt: fine");
        assert_eq!(repair_recognized("salt, sugar", true), "salt, sugar");
        assert_eq!(
            repair_recognized("sugar, salt; less than 2% of: soda", true),
            "sugar, salt; less than 2% of: soda"
        );
    }
}
