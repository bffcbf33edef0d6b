//! Feature extraction boundary.
//!
//! The pipeline does not compute audio features itself; it hands every
//! opened [`SampleFile`] to a [`FeatureExtractor`]. Any error returned by
//! the extractor marks that one sample as unusable.

use crate::data::loader::SampleFile;
use crate::data::model::{FeatureValue, Features};

pub trait FeatureExtractor {
    fn extract(&self, sample: &SampleFile) -> anyhow::Result<Features>;
}

impl<F> FeatureExtractor for F
where
    F: Fn(&SampleFile) -> anyhow::Result<Features>,
{
    fn extract(&self, sample: &SampleFile) -> anyhow::Result<Features> {
        self(sample)
    }
}

// ---------------------------------------------------------------------------
// Stock extractors
// ---------------------------------------------------------------------------

/// Reads a column of precomputed features as the feature vector.
#[derive(Debug, Clone)]
pub struct StoredVectorExtractor {
    pub column: String,
}

impl Default for StoredVectorExtractor {
    fn default() -> Self {
        Self {
            column: "features".to_string(),
        }
    }
}

impl FeatureExtractor for StoredVectorExtractor {
    fn extract(&self, sample: &SampleFile) -> anyhow::Result<Features> {
        let values = sample.column_f64(&self.column)?;
        if values.is_empty() {
            anyhow::bail!("{}: '{}' column is empty", sample.name(), self.column);
        }
        Ok(Features::Vector(values))
    }
}

/// Summarizes every numeric column as `<col>_mean`, `<col>_std`,
/// `<col>_min` and `<col>_max`, in schema order. Empty columns yield nulls,
/// which normalization later drops.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnSummaryExtractor;

impl FeatureExtractor for ColumnSummaryExtractor {
    fn extract(&self, sample: &SampleFile) -> anyhow::Result<Features> {
        let mut mapping = Vec::new();
        for name in sample.column_names() {
            if !sample.is_numeric_column(name) {
                continue;
            }
            let values = sample.column_f64(name)?;
            let stats = summarize(&values);
            for (suffix, stat) in ["mean", "std", "min", "max"].into_iter().zip(stats) {
                let value = stat.map_or(FeatureValue::Null, FeatureValue::Float);
                mapping.push((format!("{name}_{suffix}"), value));
            }
        }
        if mapping.is_empty() {
            anyhow::bail!("{}: no numeric columns", sample.name());
        }
        Ok(Features::Mapping(mapping))
    }
}

/// mean, population std, min, max (NaNs ignored).
fn summarize(values: &[f64]) -> [Option<f64>; 4] {
    let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if finite.is_empty() {
        return [None; 4];
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let var = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    [Some(mean), Some(var.sqrt()), Some(min), Some(max)]
}
