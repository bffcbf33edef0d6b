use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

// ---------------------------------------------------------------------------
// PipelineConfig – every tunable of a preparation run
// ---------------------------------------------------------------------------

/// Settings for [`crate::pipeline::load_data`].
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides:
///
/// ```json
/// { "feature_length": 64, "top_k": 40 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Manifest column listing the permitted file names.
    pub manifest_column: String,
    /// File extension (without the dot) of sample containers.
    pub sample_extension: String,
    /// Container attribute holding the class label.
    pub label_attribute: String,
    /// Expected feature dimensionality. When unset, the first successful
    /// extraction (in sorted file order) fixes it.
    pub feature_length: Option<usize>,
    /// Standard deviation of the augmentation noise.
    pub noise_std: f64,
    pub augment_seed: u64,
    /// Neighbours used when synthesizing minority samples.
    pub k_neighbors: usize,
    pub balance_seed: u64,
    /// Upper bound on the number of retained feature columns.
    pub top_k: usize,
    /// Where the fitted label encoder is written on every run.
    pub encoder_path: PathBuf,
    /// Optional destination for the fitted scaler and selected columns.
    pub transform_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            manifest_column: "filename".to_string(),
            sample_extension: "parquet".to_string(),
            label_attribute: "genre".to_string(),
            feature_length: None,
            noise_std: 0.05,
            augment_seed: 0,
            k_neighbors: 5,
            balance_seed: 42,
            top_k: 100,
            encoder_path: PathBuf::from("./nn_training/label_encoder.json"),
            transform_path: None,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file; missing keys keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| PrepError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject settings that would silently produce a degenerate dataset:
    /// noise-free twins, zero-width features, or nothing to select.
    pub fn validate(&self) -> Result<()> {
        if !(self.noise_std.is_finite() && self.noise_std > 0.0) {
            return Err(PrepError::InvalidParameter(format!(
                "noise_std must be a positive number, got {}",
                self.noise_std
            )));
        }
        if self.top_k == 0 {
            return Err(PrepError::InvalidParameter("top_k must be at least 1".into()));
        }
        if self.k_neighbors == 0 {
            return Err(PrepError::InvalidParameter("k_neighbors must be at least 1".into()));
        }
        if self.feature_length == Some(0) {
            return Err(PrepError::InvalidParameter(
                "feature_length must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}
