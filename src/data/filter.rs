use std::path::{Path, PathBuf};

use super::manifest::Manifest;
use crate::error::{PrepError, Result};

/// Return the container files in `dir` that the manifest permits.
///
/// An entry is kept when:
/// * it is a regular file
/// * its extension equals `extension` exactly (a leading dot is ignored)
/// * its file name appears in the manifest
///
/// The result is sorted by file name so that runs do not depend on the
/// platform's directory listing order.
pub fn select_sample_files(dir: &Path, manifest: &Manifest, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| PrepError::io(dir, e))?;

    let mut selected = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PrepError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() || !has_extension(&path, extension) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if manifest.contains(name) {
            selected.push(path);
        } else {
            log::debug!("{name} not in manifest, ignoring");
        }
    }

    selected.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(selected)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == extension.trim_start_matches('.'))
}
