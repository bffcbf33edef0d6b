/// Data layer: manifest, sample containers, and per-sample normalization.
///
/// Architecture:
/// ```text
///   dataset.csv        sample dir (*.parquet)
///        │                   │
///        ▼                   ▼
///   ┌──────────┐       ┌──────────┐
///   │ manifest  │ ────▶ │  filter   │  whitelist + sort → Vec<PathBuf>
///   └──────────┘       └──────────┘
///                            │
///                            ▼
///                      ┌──────────┐
///                      │  loader   │  open container → SampleFile
///                      └──────────┘
///                            │  FeatureExtractor
///                            ▼
///                      ┌───────────┐
///                      │ normalize  │  flatten + pad/truncate → LabeledSample
///                      └───────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod manifest;
pub mod model;
pub mod normalize;
