use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Bijection between label strings and class ids `0..C`.
///
/// Classes are the sorted distinct labels, so the same label list always
/// yields the same encoding regardless of input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes: BTreeSet<&str> = labels.iter().map(AsRef::as_ref).collect();
        Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn encode(&self, label: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| PrepError::UnknownLabel(label.to_string()))
    }

    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels.iter().map(|l| self.encode(l.as_ref())).collect()
    }

    pub fn inverse_transform(&self, ids: &[usize]) -> Result<Vec<String>> {
        ids.iter()
            .map(|&id| {
                self.classes
                    .get(id)
                    .cloned()
                    .ok_or(PrepError::UnknownClass {
                        id,
                        classes: self.classes.len(),
                    })
            })
            .collect()
    }

    /// Write the encoder as JSON, overwriting `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        super::write_json(path, self)?;
        log::info!("label encoder ({} classes) saved to {}", self.classes.len(), path.display());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_sorted_and_distinct() {
        let enc = LabelEncoder::fit(&["rock", "jazz", "rock", "blues"]);
        assert_eq!(enc.classes(), &["blues", "jazz", "rock"]);
        assert_eq!(enc.transform(&["rock", "blues", "jazz"]).unwrap(), vec![2, 0, 1]);
        assert_eq!(enc.inverse_transform(&[1, 2]).unwrap(), vec!["jazz", "rock"]);
    }

    #[test]
    fn encoding_ignores_input_order() {
        let a = LabelEncoder::fit(&["b", "a", "c"]);
        let b = LabelEncoder::fit(&["c", "c", "a", "b"]);
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_values_are_errors() {
        let enc = LabelEncoder::fit(&["a", "b"]);
        assert!(matches!(enc.encode("z"), Err(PrepError::UnknownLabel(l)) if l == "z"));
        assert!(matches!(
            enc.inverse_transform(&[2]),
            Err(PrepError::UnknownClass { id: 2, classes: 2 })
        ));
    }

    #[test]
    fn save_creates_directories_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nn_training").join("label_encoder.json");

        LabelEncoder::fit(&["x"]).save(&path).unwrap();
        let enc = LabelEncoder::fit(&["metal", "folk"]);
        enc.save(&path).unwrap();

        assert_eq!(LabelEncoder::load(&path).unwrap(), enc);
    }
}
