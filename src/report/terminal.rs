use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{AnalysisReport, ClassificationResult, ExtractionPath, SafetyLabel};

/// Render a colored terminal report.
pub fn render(report: &AnalysisReport, verbose: bool, quiet: bool) -> Result<()> {
    let stats = &report.stats;

    if quiet {
        println!(
            "Total: {}  Safe: {}  Controversial: {}  Harmful: {}",
            stats.total,
            stats.safe.to_string().green(),
            stats.controversial.to_string().yellow(),
            stats.harmful.to_string().red(),
        );
        return Ok(());
    }

    println!("\n {} v{}", "riskread".bold(), env!("CARGO_PKG_VERSION"));
    println!(" Source: {} text", report.source);
    if report.extraction == ExtractionPath::Emergency {
        println!(
            " {} ingredient list recovered by a plain comma split",
            "note:".yellow()
        );
    }
    println!();

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total ingredients  : {}", stats.total));
    println!(
        " │  {:<48} │",
        format!(
            "{}  Safe            : {:>4}  {}",
            "✓".green(),
            stats.safe,
            summarize_sources(&report.results, SafetyLabel::NotHarmful)
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Controversial   : {:>4}  {}",
            "⚠".yellow(),
            stats.controversial,
            summarize_sources(&report.results, SafetyLabel::Controversial)
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Harmful         : {:>4}  {}",
            "✗".red(),
            stats.harmful,
            summarize_sources(&report.results, SafetyLabel::Harmful)
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if stats.harmful > 0 {
        println!(" {} Ingredients to avoid:\n", "[HARMFUL]".red().bold());
        render_table(&report.results, SafetyLabel::Harmful);
        println!();
    }

    if stats.controversial > 0 {
        println!(
            " {} Ingredients with mixed reviews:\n",
            "[CONTROVERSIAL]".yellow().bold()
        );
        render_table(&report.results, SafetyLabel::Controversial);
        println!();
    }

    if verbose && stats.safe > 0 {
        println!(" {} Safe ingredients:\n", "[SAFE]".green().bold());
        render_table(&report.results, SafetyLabel::NotHarmful);
        println!();
    }

    Ok(())
}

fn render_table(results: &[ClassificationResult], label: SafetyLabel) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Ingredient").add_attribute(Attribute::Bold),
            Cell::new("Label").add_attribute(Attribute::Bold),
            Cell::new("Explanation").add_attribute(Attribute::Bold),
            Cell::new("Decided by").add_attribute(Attribute::Bold),
        ]);

    let (label_str, label_color) = match label {
        SafetyLabel::NotHarmful => ("✓ not harmful", Color::Green),
        SafetyLabel::Controversial => ("⚠ controversial", Color::Yellow),
        SafetyLabel::Harmful => ("✗ harmful", Color::Red),
    };

    // Numbering follows discovery order across the whole report.
    for (index, result) in results.iter().enumerate().filter(|(_, r)| r.label == label) {
        table.add_row(vec![
            Cell::new(index + 1).set_alignment(CellAlignment::Right),
            Cell::new(&result.ingredient),
            Cell::new(label_str)
                .fg(label_color)
                .set_alignment(CellAlignment::Center),
            Cell::new(&result.explanation),
            Cell::new(result.source.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!("{}", table);
}

/// Up to three most frequent deciding stages for one label, e.g.
/// `[harmful keyword (2), override (harmful) (1)]`.
fn summarize_sources(results: &[ClassificationResult], label: SafetyLabel) -> String {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for result in results.iter().filter(|r| r.label == label) {
        let source = result.source.to_string();
        match counts.iter_mut().find(|(s, _)| *s == source) {
            Some((_, count)) => *count += 1,
            None => counts.push((source, 1)),
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let summary: Vec<String> = counts
        .iter()
        .take(3)
        .map(|(source, count)| format!("{} ({})", source, count))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DecisionSource, OverrideTable};

    fn result(label: SafetyLabel, source: DecisionSource) -> ClassificationResult {
        ClassificationResult {
            ingredient: "x".to_string(),
            label,
            explanation: String::new(),
            source,
        }
    }

    #[test]
    fn test_summarize_sources_by_frequency() {
        let results = vec![
            result(SafetyLabel::Harmful, DecisionSource::ExactOverride(OverrideTable::Harmful)),
            result(SafetyLabel::Harmful, DecisionSource::HarmfulKeyword),
            result(SafetyLabel::Harmful, DecisionSource::HarmfulKeyword),
            result(SafetyLabel::NotHarmful, DecisionSource::Default),
        ];
        assert_eq!(
            summarize_sources(&results, SafetyLabel::Harmful),
            "[harmful keyword (2), override (harmful) (1)]"
        );
        assert_eq!(summarize_sources(&results, SafetyLabel::Controversial), "");
    }
}
