use std::path::{Path, PathBuf};

use anyhow::Context;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::data::filter::select_sample_files;
use crate::data::loader::SampleFile;
use crate::data::manifest::Manifest;
use crate::data::model::{LabeledSample, SkippedSample};
use crate::data::normalize::{fit_length, flatten};
use crate::error::{PrepError, Result};
use crate::extract::FeatureExtractor;
use crate::prep::augment::augment;
use crate::prep::balance::Smote;
use crate::prep::encoder::LabelEncoder;
use crate::prep::onehot::one_hot;
use crate::prep::scale::StandardScaler;
use crate::prep::select::SelectKBest;
use crate::prep::write_json;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// What happened during a run, for logging and inspection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub files_selected: usize,
    pub accepted: usize,
    pub skipped: Vec<SkippedSample>,
    /// Canonical feature length every vector was padded/truncated to.
    pub feature_length: usize,
    pub augmented_rows: usize,
    pub balanced_rows: usize,
}

/// Training-ready dataset.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    /// Scaled, column-selected features, shape `[N, K]`.
    pub features: Array2<f64>,
    /// One-hot labels, shape `[N, C]`.
    pub labels: Array2<f64>,
    pub encoder: LabelEncoder,
    pub transforms: FittedTransforms,
    pub report: PipelineReport,
}

impl PreparedDataset {
    pub fn num_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn num_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn num_classes(&self) -> usize {
        self.labels.ncols()
    }
}

/// The fitted scaler and column selection, needed to prepare inference-time
/// features the same way as the training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTransforms {
    pub scaler: StandardScaler,
    pub selector: SelectKBest,
}

impl FittedTransforms {
    /// Scale then select, on rows already fitted to the canonical length.
    pub fn apply(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let scaled = self.scaler.transform(x)?;
        self.selector.transform(&scaled)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)?;
        log::info!("fitted transforms saved to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| PrepError::Persist {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Run the full preparation pipeline over the sample containers in
/// `sample_dir` that `manifest_path` permits.
///
/// Samples whose extraction fails (or that carry no label, or whose data
/// pages cannot be decoded) are skipped and logged; every other failure,
/// including an unreadable container footer, aborts the run.
pub fn load_data<E>(
    sample_dir: &Path,
    manifest_path: &Path,
    extractor: &E,
    config: &PipelineConfig,
) -> Result<PreparedDataset>
where
    E: FeatureExtractor + ?Sized,
{
    config.validate()?;
    let manifest = Manifest::from_path(manifest_path, &config.manifest_column)?;
    let files = select_sample_files(sample_dir, &manifest, &config.sample_extension)?;
    log::info!(
        "{} of {} manifest entries found in {}",
        files.len(),
        manifest.len(),
        sample_dir.display()
    );

    let (samples, skipped, feature_length) = collect_samples(&files, extractor, config)?;
    if samples.is_empty() {
        return Err(PrepError::EmptyDataset(format!(
            "none of {} selected files yielded features",
            files.len()
        )));
    }
    log::info!(
        "{} samples accepted, {} skipped, feature length {}",
        samples.len(),
        skipped.len(),
        feature_length
    );

    let augmented = augment(&samples, config.noise_std, config.augment_seed);

    let labels: Vec<&str> = augmented.iter().map(|s| s.label.as_str()).collect();
    let encoder = LabelEncoder::fit(&labels);
    let encoded = encoder.transform(&labels)?;
    let matrix = to_matrix(&augmented, feature_length)?;
    log::info!(
        "{} rows after augmentation, {} classes: {:?}",
        matrix.nrows(),
        encoder.num_classes(),
        encoder.classes()
    );

    let smote = Smote {
        k_neighbors: config.k_neighbors,
        seed: config.balance_seed,
    };
    let (balanced, balanced_labels) = smote.fit_resample(&matrix, &encoded)?;
    log::info!("{} rows after balancing", balanced.nrows());

    let (scaler, scaled) = StandardScaler::fit_transform(&balanced)?;
    let selector = SelectKBest::fit(&scaled, &balanced_labels, config.top_k)?;
    let features = selector.transform(&scaled)?;
    let one_hot_labels = one_hot(&balanced_labels, encoder.num_classes())?;

    encoder.save(&config.encoder_path)?;
    let transforms = FittedTransforms { scaler, selector };
    match &config.transform_path {
        Some(path) => transforms.save(path)?,
        None => log::warn!(
            "transform_path not set: the fitted scaler is not persisted, \
             inference-time features cannot be scaled identically"
        ),
    }

    let report = PipelineReport {
        files_selected: files.len(),
        accepted: samples.len(),
        skipped,
        feature_length,
        augmented_rows: augmented.len(),
        balanced_rows: features.nrows(),
    };
    log::info!(
        "prepared {} x {} features, {} x {} labels",
        features.nrows(),
        features.ncols(),
        one_hot_labels.nrows(),
        one_hot_labels.ncols()
    );

    Ok(PreparedDataset {
        features,
        labels: one_hot_labels,
        encoder,
        transforms,
        report,
    })
}

// ---------------------------------------------------------------------------
// Per-sample stage
// ---------------------------------------------------------------------------

/// Open, extract and normalize every file.
///
/// The canonical length is `config.feature_length` when set, otherwise the
/// length of the first successful extraction in file order.
fn collect_samples<E>(
    files: &[PathBuf],
    extractor: &E,
    config: &PipelineConfig,
) -> Result<(Vec<LabeledSample>, Vec<SkippedSample>, usize)>
where
    E: FeatureExtractor + ?Sized,
{
    let mut raw = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();

    for path in files {
        let sample = SampleFile::open(path)?;
        match extract_sample(&sample, extractor, &config.label_attribute) {
            Ok((features, label)) => raw.push((sample.name().to_string(), features, label)),
            Err(e) => {
                log::warn!("Error processing file {}: {e:#}", sample.name());
                skipped.push(SkippedSample {
                    file_name: sample.name().to_string(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    let feature_length = config
        .feature_length
        .or_else(|| raw.first().map(|(_, f, _)| f.len()))
        .unwrap_or(0);

    let samples = raw
        .into_iter()
        .map(|(source, features, label)| LabeledSample {
            source,
            features: fit_length(features, feature_length),
            label,
        })
        .collect();

    Ok((samples, skipped, feature_length))
}

fn extract_sample<E>(
    sample: &SampleFile,
    extractor: &E,
    label_attribute: &str,
) -> anyhow::Result<(Vec<f64>, String)>
where
    E: FeatureExtractor + ?Sized,
{
    let label = sample
        .attribute(label_attribute)
        .with_context(|| format!("missing '{label_attribute}' attribute"))?
        .to_string();
    let features = flatten(extractor.extract(sample)?);
    if features.is_empty() {
        anyhow::bail!("extractor returned no numeric features");
    }
    Ok((features, label))
}

fn to_matrix(samples: &[LabeledSample], width: usize) -> Result<Array2<f64>> {
    let flat: Vec<f64> = samples.iter().flat_map(|s| s.features.iter().copied()).collect();
    Array2::from_shape_vec((samples.len(), width), flat)
        .map_err(|e| PrepError::ShapeMismatch(e.to_string()))
}
