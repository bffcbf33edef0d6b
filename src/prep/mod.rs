/// Dataset-level preparation stages, applied in this order:
///
/// ```text
///  Vec<LabeledSample>
///        │ augment      one noisy twin per sample
///        │ encoder      label strings → class ids
///        │ balance      SMOTE up to the majority class count
///        │ scale        per-column standardization
///        │ select       top-K columns by ANOVA F score
///        ▼ onehot       class ids → one-hot rows
///  (features [N, K], labels [N, C])
/// ```

pub mod augment;
pub mod balance;
pub mod encoder;
pub mod onehot;
pub mod scale;
pub mod select;

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{PrepError, Result};

/// Serialize `value` as pretty JSON, creating parent directories and
/// overwriting any existing file.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PrepError::io(parent, e))?;
    }
    let file = std::fs::File::create(path).map_err(|e| PrepError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| PrepError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|e| PrepError::io(path, e))
}
