//! Optional statistical fallback for the classification cascade.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Number of classes in the safety taxonomy.
pub const CLASS_COUNT: usize = 3;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model artifact {field} has {found} entries, expected 3")]
    Shape { field: String, found: usize },

    #[error("no known features in {0:?}")]
    NoFeatures(String),

    #[error("model returned unknown class id {0}")]
    ClassOutOfRange(u8),
}

/// A loaded classifier. Implementations must be stateless per call so one
/// handle can serve concurrent requests.
pub trait SafetyModel: Send + Sync {
    /// Predict a class id (`0` safe, `1` controversial, `2` harmful).
    fn predict(&self, ingredient: &str) -> Result<u8, ModelError>;
}

/// Linear bag-of-words scorer: per-class intercept plus per-token weights.
///
/// ```json
/// { "intercept": [0.2, 0.0, -0.2], "weights": { "aspartame": [-1.0, 0.2, 2.4] } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LinearTokenModel {
    intercept: Vec<f64>,
    #[serde(default)]
    weights: HashMap<String, Vec<f64>>,
}

impl LinearTokenModel {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: LinearTokenModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.weights.len()
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.intercept.len() != CLASS_COUNT {
            return Err(ModelError::Shape {
                field: "intercept".to_string(),
                found: self.intercept.len(),
            });
        }
        for (token, weights) in &self.weights {
            if weights.len() != CLASS_COUNT {
                return Err(ModelError::Shape {
                    field: format!("weights.{token}"),
                    found: weights.len(),
                });
            }
        }
        Ok(())
    }
}

impl SafetyModel for LinearTokenModel {
    fn predict(&self, ingredient: &str) -> Result<u8, ModelError> {
        let lower = ingredient.to_lowercase();
        let mut scores = self.intercept.clone();
        let mut matched = false;

        for token in lower.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            if let Some(weights) = self.weights.get(token) {
                matched = true;
                for (score, weight) in scores.iter_mut().zip(weights) {
                    *score += weight;
                }
            }
        }

        if !matched {
            return Err(ModelError::NoFeatures(ingredient.to_string()));
        }

        // Ties resolve to the lower class id.
        let mut best = 0;
        for (class, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = class;
            }
        }
        Ok(best as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ARTIFACT: &str = r#"{
        "intercept": [0.5, 0.0, 0.0],
        "weights": {
            "nitrite": [-1.0, 0.5, 2.0],
            "gum": [0.0, 1.0, 0.0],
            "oat": [1.0, 0.0, 0.0]
        }
    }"#;

    #[test]
    fn test_predicts_highest_scoring_class() {
        let model = LinearTokenModel::from_json(ARTIFACT).unwrap();
        assert_eq!(model.predict("Sodium Nitrite").unwrap(), 2);
        assert_eq!(model.predict("guar gum").unwrap(), 1);
        assert_eq!(model.predict("rolled oat").unwrap(), 0);
    }

    #[test]
    fn test_unknown_vocabulary_is_an_error() {
        let model = LinearTokenModel::from_json(ARTIFACT).unwrap();
        assert!(matches!(model.predict("quinoa"), Err(ModelError::NoFeatures(_))));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let err = LinearTokenModel::from_json(r#"{"intercept": [0.0, 1.0]}"#).unwrap_err();
        assert!(matches!(err, ModelError::Shape { found: 2, .. }));

        let err = LinearTokenModel::from_json(
            r#"{"intercept": [0.0, 0.0, 0.0], "weights": {"x": [1.0]}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("weights.x"));
    }

    #[test]
    fn test_load_from_file() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", ARTIFACT).unwrap();
        let model = LinearTokenModel::load(f.path()).unwrap();
        assert_eq!(model.vocabulary_size(), 3);

        let missing = LinearTokenModel::load(Path::new("/nonexistent/model.json"));
        assert!(matches!(missing, Err(ModelError::Io { .. })));
    }
}
