//! Wires the text stages and the classifier into one request path.

use anyhow::Result;
use tracing::{debug, info};

use crate::classify::IngredientClassifier;
use crate::config::PipelineConfig;
use crate::models::{AggregateStats, AnalysisReport, ExtractionPath, RawText, SourceKind};
use crate::text::gibberish::is_gibberish;
use crate::text::normalizer::Normalizer;
use crate::text::postprocess::PostProcessor;
use crate::text::repair::repair_recognized;
use crate::text::segmenter::Segmenter;

const EMERGENCY_PREFIXES: &[&str] = &["made of:", "contains:", "ingredients:", "less than"];

/// Result of turning raw label text into ingredient names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Empty text, the recognizer's sentinel, or gibberish.
    NoInput,
    Ingredients(Vec<String>),
    /// The stages found nothing; the naive comma split did.
    Emergency(Vec<String>),
    NoIngredients,
}

/// User-facing outcome of one analysis.
#[derive(Debug)]
pub enum Outcome {
    Report(AnalysisReport),
    NoInput,
    NoIngredients,
}

pub struct Pipeline<'a> {
    normalizer: Normalizer,
    segmenter: Segmenter,
    postprocessor: PostProcessor,
    settings: PipelineConfig,
    classifier: &'a IngredientClassifier,
}

impl<'a> Pipeline<'a> {
    pub fn new(classifier: &'a IngredientClassifier, settings: PipelineConfig) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::new()?,
            segmenter: Segmenter::new()?,
            postprocessor: PostProcessor::new()?,
            settings,
            classifier,
        })
    }

    pub fn extract(&self, raw: &RawText) -> Extraction {
        if raw.is_blank() {
            debug!("no text to extract from");
            return Extraction::NoInput;
        }

        let names = match raw.kind() {
            SourceKind::Typed => {
                let normalized = self.normalizer.normalize(raw.text());
                debug!(%normalized, "normalized typed text");
                self.segmenter
                    .segment(&normalized)
                    .into_iter()
                    .map(|c| c.text)
                    .collect::<Vec<_>>()
            }
            SourceKind::Image => {
                let repaired = repair_recognized(raw.text(), self.settings.strip_label_header);
                debug!(%repaired, "repaired recognized text");
                let normalized = self.normalizer.normalize(&repaired);
                debug!(%normalized, "normalized recognized text");
                if is_gibberish(&normalized) {
                    info!("recognized text rejected as gibberish");
                    return Extraction::NoInput;
                }
                let candidates = self.segmenter.segment(&normalized);
                debug!(count = candidates.len(), "segmented candidates");
                self.postprocessor
                    .clean(&candidates)
                    .into_iter()
                    .map(|c| c.name)
                    .collect()
            }
        };

        if !names.is_empty() {
            debug!(?names, "extracted ingredients");
            return Extraction::Ingredients(names);
        }

        let fallback = emergency_extract(raw.text());
        if fallback.is_empty() {
            info!("no ingredients found");
            Extraction::NoIngredients
        } else {
            info!(count = fallback.len(), "emergency extraction used");
            Extraction::Emergency(fallback)
        }
    }

    pub fn analyze(&self, raw: &RawText) -> Outcome {
        let (extraction, names) = match self.extract(raw) {
            Extraction::NoInput => return Outcome::NoInput,
            Extraction::NoIngredients => return Outcome::NoIngredients,
            Extraction::Ingredients(names) => (ExtractionPath::Pipeline, names),
            Extraction::Emergency(names) => (ExtractionPath::Emergency, names),
        };
        Outcome::Report(self.report(raw.kind(), extraction, &names))
    }

    /// Classify names as given, skipping extraction.
    pub fn analyze_names(&self, names: &[String]) -> Outcome {
        if names.iter().all(|n| n.trim().is_empty()) {
            return Outcome::NoInput;
        }
        Outcome::Report(self.report(SourceKind::Typed, ExtractionPath::Direct, names))
    }

    fn report(&self, source: SourceKind, extraction: ExtractionPath, names: &[String]) -> AnalysisReport {
        let results = self.classifier.classify_all(names);
        let stats = AggregateStats::from_results(&results);
        info!(
            total = stats.total,
            harmful = stats.harmful,
            controversial = stats.controversial,
            safe = stats.safe,
            "analysis complete"
        );
        AnalysisReport {
            source,
            extraction,
            results,
            stats,
        }
    }
}

/// Comma split of the untouched text with common label prefixes removed.
fn emergency_extract(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for part in text.split(',') {
        let mut part = part.trim();
        if part.chars().count() <= 3 {
            continue;
        }
        for prefix in EMERGENCY_PREFIXES {
            let has_prefix = part
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
            if has_prefix {
                part = part[prefix.len()..].trim();
            }
        }
        if !part.is_empty() {
            found.push(part.to_string());
        }
    }
    found
}
