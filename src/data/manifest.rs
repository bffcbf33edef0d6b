use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{PrepError, Result};

/// The set of file names a run is allowed to process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    names: BTreeSet<String>,
}

impl Manifest {
    /// Read a CSV manifest with a header row; `column` lists the file names.
    /// Other columns are ignored.
    pub fn from_path(path: &Path, column: &str) -> Result<Self> {
        let csv_err = |source| PrepError::Manifest {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
        let idx = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| PrepError::ManifestColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })?;

        let mut names = BTreeSet::new();
        for result in reader.records() {
            let record = result.map_err(csv_err)?;
            if let Some(name) = record.get(idx).map(str::trim).filter(|n| !n.is_empty()) {
                names.insert(name.to_string());
            }
        }

        log::debug!("manifest {} lists {} files", path.display(), names.len());
        Ok(Self { names })
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.names.contains(file_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Manifest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
