//! Writes a synthetic sample directory and manifest for trying the pipeline:
//!
//! ```text
//! generate_sample [out_dir]
//!   out_dir/samples/<genre>_<n>.parquet   features + genre attribute
//!   out_dir/dataset.csv                   filename,genre
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Builder, ListBuilder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use genre_prep::data::loader::write_sample;
use genre_prep::prep::augment::gauss;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FEATURE_LEN: usize = 40;

/// Each genre gets its own centroid; samples scatter around it. Lengths vary
/// a little so padding and truncation get exercised.
fn generate_features(centroid: &[f64], rng: &mut StdRng) -> Vec<f64> {
    let len = FEATURE_LEN - 2 + rng.gen_range(0..5);
    (0..len)
        .map(|i| gauss(rng, centroid[i % centroid.len()], 0.3))
        .collect()
}

fn sample_batch(features: &[f64], title: &str) -> Result<RecordBatch> {
    let mut builder = ListBuilder::new(Float64Builder::new());
    builder.values().append_slice(features);
    builder.append(true);

    let schema = Arc::new(Schema::new(vec![
        Field::new(
            "features",
            DataType::List(Arc::new(Field::new("item", DataType::Float64, true))),
            false,
        ),
        Field::new("title", DataType::Utf8, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![Arc::new(builder.finish()), Arc::new(StringArray::from(vec![title]))],
    )
    .context("building record batch")
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    let sample_dir = out_dir.join("samples");
    std::fs::create_dir_all(&sample_dir)
        .with_context(|| format!("creating {}", sample_dir.display()))?;

    let mut rng = StdRng::seed_from_u64(42);

    // Unequal counts so the balancer has work to do.
    let genres = [("blues", 8), ("classical", 5), ("metal", 6), ("reggae", 4)];

    let manifest_path = out_dir.join("dataset.csv");
    let mut manifest = csv::Writer::from_path(&manifest_path).context("creating manifest")?;
    manifest.write_record(["filename", "genre"])?;

    let mut written = 0;
    for (g, &(genre, count)) in genres.iter().enumerate() {
        let centroid: Vec<f64> = (0..FEATURE_LEN)
            .map(|i| ((i * (g + 1)) as f64 * 0.37).sin() * 2.0)
            .collect();

        for n in 0..count {
            let name = format!("{genre}_{n:03}.parquet");
            let features = generate_features(&centroid, &mut rng);
            let batch = sample_batch(&features, &name)?;
            write_sample(&sample_dir.join(&name), &batch, &[("genre", genre)])?;
            manifest.write_record([name.as_str(), genre])?;
            written += 1;
        }
    }

    // Present on disk but absent from the manifest.
    let stray = generate_features(&[0.0], &mut rng);
    write_sample(
        &sample_dir.join("unlisted.parquet"),
        &sample_batch(&stray, "unlisted")?,
        &[("genre", "blues")],
    )?;
    manifest.flush()?;

    println!(
        "Wrote {written} samples ({FEATURE_LEN}±2 features each) to {} and manifest {}",
        sample_dir.display(),
        manifest_path.display()
    );
    Ok(())
}
