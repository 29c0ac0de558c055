//! Adapter over an external OCR binary (`tesseract <image> stdout`).
//!
//! Every failure degrades to "no text": the pipeline only ever sees a string
//! or the no-text sentinel.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::OcrConfig;

#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("recognition of {} timed out after {secs}s", .path.display())]
    Timeout { path: PathBuf, secs: u64 },

    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

pub struct Recognizer {
    command: String,
    timeout: Duration,
}

impl Recognizer {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Raw engine output with whitespace runs collapsed to single spaces.
    pub async fn try_recognize(&self, path: &Path) -> Result<String, RecognizeError> {
        let child = Command::new(&self.command)
            .arg(path)
            .arg("stdout")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| RecognizeError::Timeout {
                path: path.to_path_buf(),
                secs: self.timeout.as_secs(),
            })?
            .map_err(|source| RecognizeError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RecognizeError::Failed {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// `None` when the engine failed or found no text.
    pub async fn recognize(&self, path: &Path) -> Option<String> {
        match self.try_recognize(path).await {
            Ok(text) if !text.is_empty() => {
                debug!(path = %path.display(), chars = text.len(), "recognized text");
                Some(text)
            }
            Ok(_) => {
                warn!(path = %path.display(), "no text detected");
                None
            }
            Err(e) => {
                warn!(error = %e, "recognition failed");
                None
            }
        }
    }

    /// Recognize several images concurrently; texts are joined with a comma
    /// boundary in argument order. `None` when no image yielded text.
    pub async fn recognize_all(&self, paths: &[PathBuf]) -> Option<String> {
        let texts: Vec<String> = join_all(paths.iter().map(|p| self.recognize(p)))
            .await
            .into_iter()
            .flatten()
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.join(", "))
        }
    }
}
