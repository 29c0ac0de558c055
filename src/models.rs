use serde::{Deserialize, Serialize};

/// Sentinel the recognizer hands over when an image produced no text.
pub const NO_TEXT_SENTINEL: &str = "No text detected";

/// Where a piece of label text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Typed,
    Image,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Typed => write!(f, "typed"),
            SourceKind::Image => write!(f, "image"),
        }
    }
}

/// Label text as received. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct RawText {
    text: String,
    kind: SourceKind,
}

impl RawText {
    pub fn new(text: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Wrap the recognizer's answer; `None` becomes the no-text sentinel.
    pub fn recognized(text: Option<String>) -> Self {
        Self::new(
            text.unwrap_or_else(|| NO_TEXT_SENTINEL.to_string()),
            SourceKind::Image,
        )
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Empty, whitespace-only, or the recognizer's sentinel.
    pub fn is_blank(&self) -> bool {
        let trimmed = self.text.trim();
        trimmed.is_empty() || trimmed == NO_TEXT_SENTINEL
    }
}

/// A substring produced by segmentation, casing untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    /// Index of the comma-separated part this candidate came from.
    pub position: usize,
}

impl Candidate {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

/// A candidate that survived image-path cleanup and re-deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedIngredient {
    pub name: String,
}

/// The fixed three-class safety taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SafetyLabel {
    #[serde(rename = "Not Harmful", alias = "not-harmful", alias = "safe")]
    NotHarmful,
    #[serde(rename = "Controversial", alias = "controversial")]
    Controversial,
    #[serde(rename = "Harmful", alias = "harmful")]
    Harmful,
}

impl SafetyLabel {
    /// Map a statistical model class id to a label.
    pub fn from_class_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(SafetyLabel::NotHarmful),
            1 => Some(SafetyLabel::Controversial),
            2 => Some(SafetyLabel::Harmful),
            _ => None,
        }
    }

    /// Generic explanation used when a label comes from the model.
    pub fn generic_explanation(&self) -> &'static str {
        match self {
            SafetyLabel::NotHarmful => "Generally safe for consumption",
            SafetyLabel::Controversial => "Mixed safety reviews - consume with caution",
            SafetyLabel::Harmful => "Potential health risks - avoid or limit",
        }
    }
}

impl std::fmt::Display for SafetyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SafetyLabel::NotHarmful => write!(f, "Not Harmful"),
            SafetyLabel::Controversial => write!(f, "Controversial"),
            SafetyLabel::Harmful => write!(f, "Harmful"),
        }
    }
}

/// Which of the three exact-match tables produced an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideTable {
    Safe,
    Harmful,
    Controversial,
}

/// The cascade stage that decided a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "table", rename_all = "kebab-case")]
pub enum DecisionSource {
    ExactOverride(OverrideTable),
    HarmfulKeyword,
    ControversialKeyword,
    SafePattern,
    Model,
    Default,
}

impl std::fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionSource::ExactOverride(OverrideTable::Safe) => write!(f, "override (safe)"),
            DecisionSource::ExactOverride(OverrideTable::Harmful) => {
                write!(f, "override (harmful)")
            }
            DecisionSource::ExactOverride(OverrideTable::Controversial) => {
                write!(f, "override (controversial)")
            }
            DecisionSource::HarmfulKeyword => write!(f, "harmful keyword"),
            DecisionSource::ControversialKeyword => write!(f, "controversial keyword"),
            DecisionSource::SafePattern => write!(f, "safe pattern"),
            DecisionSource::Model => write!(f, "model"),
            DecisionSource::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub ingredient: String,
    pub label: SafetyLabel,
    pub explanation: String,
    pub source: DecisionSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total: usize,
    pub harmful: usize,
    pub controversial: usize,
    pub safe: usize,
}

impl AggregateStats {
    /// Count labels; `total` is the sum of the three buckets by construction.
    pub fn from_results(results: &[ClassificationResult]) -> Self {
        let mut stats = AggregateStats::default();
        for result in results {
            match result.label {
                SafetyLabel::Harmful => stats.harmful += 1,
                SafetyLabel::Controversial => stats.controversial += 1,
                SafetyLabel::NotHarmful => stats.safe += 1,
            }
        }
        stats.total = stats.harmful + stats.controversial + stats.safe;
        stats
    }
}

/// How the ingredient list of a report was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPath {
    Pipeline,
    Emergency,
    Direct,
}

impl std::fmt::Display for ExtractionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionPath::Pipeline => write!(f, "pipeline"),
            ExtractionPath::Emergency => write!(f, "emergency"),
            ExtractionPath::Direct => write!(f, "direct"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub source: SourceKind,
    pub extraction: ExtractionPath,
    pub results: Vec<ClassificationResult>,
    pub stats: AggregateStats,
}
