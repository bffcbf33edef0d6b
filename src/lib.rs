//! Prepares per-sample audio feature datasets for genre classifier training.
//!
//! [`load_data`] reads a CSV manifest, opens the permitted Parquet sample
//! containers, extracts and normalizes features, augments, balances,
//! scales and selects them, and returns training-ready matrices.

pub mod config;
pub mod data;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod prep;

pub use config::PipelineConfig;
pub use data::model::{FeatureValue, Features};
pub use error::{PrepError, Result};
pub use extract::{ColumnSummaryExtractor, FeatureExtractor, StoredVectorExtractor};
pub use pipeline::{load_data, FittedTransforms, PipelineReport, PreparedDataset};
