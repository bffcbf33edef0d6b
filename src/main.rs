use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use genre_prep::{load_data, PipelineConfig, StoredVectorExtractor};

/// Usage: `genre-prep <sample_dir> <manifest.csv> [config.json]`
fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (sample_dir, manifest) = match args.as_slice() {
        [dir, manifest, ..] => (PathBuf::from(dir), PathBuf::from(manifest)),
        _ => bail!("usage: genre-prep <sample_dir> <manifest.csv> [config.json]"),
    };
    let config = match args.get(2) {
        Some(path) => PipelineConfig::from_path(Path::new(path)).context("loading config")?,
        None => PipelineConfig::default(),
    };

    let dataset = load_data(&sample_dir, &manifest, &StoredVectorExtractor::default(), &config)
        .context("preparing dataset")?;

    println!(
        "{} of {} files used, {} skipped; features: {} x {}, labels: {} x {} ({})",
        dataset.report.accepted,
        dataset.report.files_selected,
        dataset.report.skipped.len(),
        dataset.num_samples(),
        dataset.num_features(),
        dataset.labels.nrows(),
        dataset.num_classes(),
        dataset.encoder.classes().join(", ")
    );
    Ok(())
}
