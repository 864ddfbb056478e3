//! Configuration structures for the statement processing pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BankscanError, Result};

/// Main configuration for the bankscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BankscanConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Pipeline scheduling configuration.
    pub pipeline: PipelineConfig,
}

impl BankscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| BankscanError::Config(format!("invalid config {}: {}", path.display(), e)))
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to extract (0 = unlimited).
    pub max_pages: usize,

    /// Time budget for extracting text from one document, in seconds.
    pub extraction_timeout_secs: u64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            extraction_timeout_secs: 30,
        }
    }
}

/// Pipeline scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of documents processed concurrently. Further runs
    /// queue on the pipeline's semaphore.
    pub max_concurrent: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}
