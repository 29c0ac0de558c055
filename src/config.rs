use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::classify::tables::RuleTables;

/// Root configuration structure, deserialized from `.riskread/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub model: ModelConfig,
    /// Replaces the built-in rule tables entirely when present.
    #[serde(default)]
    pub rules: Option<RuleTables>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Drop everything up to the first colon of recognized text
    /// (`"INGREDIENTS:"`, `"MADE OF:"`). Defaults to `true`.
    #[serde(default = "default_true")]
    pub strip_label_header: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strip_label_header: true,
        }
    }
}

/// External OCR engine invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_command")]
    pub command: String,
    #[serde(default = "default_ocr_timeout")]
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: default_ocr_command(),
            timeout_secs: default_ocr_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelConfig {
    /// Path to a linear token model JSON artifact.
    pub path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_ocr_command() -> String {
    "tesseract".to_string()
}

fn default_ocr_timeout() -> u64 {
    30
}

impl Config {
    /// The configured rule tables, or the embedded defaults.
    pub fn rule_tables(&mut self) -> Result<RuleTables> {
        match self.rules.take() {
            Some(tables) => Ok(tables),
            None => RuleTables::builtin(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<base_dir>/.riskread/config.toml`
/// 3. `~/.config/riskread/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = base_dir.join(".riskread").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("riskread").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}
