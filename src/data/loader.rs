use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeListArray,
    ListArray,
};
use arrow::datatypes::{DataType, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{PrepError, Result};

// ---------------------------------------------------------------------------
// SampleFile – one opened per-sample container
// ---------------------------------------------------------------------------

/// An opened Parquet sample container.
///
/// Layout:
/// - file-level key/value metadata holds the sample attributes
///   (the class label lives under e.g. `genre`)
/// - columns hold whatever content the feature extractor reads: flat
///   numeric columns or `List<Float64>` / `List<Float32>` columns
///
/// The file handle is released once `open` returns. Only an unreadable
/// footer makes `open` fail; a damaged data page surfaces later as an
/// `anyhow::Error` from [`SampleFile::column_f64`], so it counts against the
/// one sample rather than the whole run.
#[derive(Debug, Clone)]
pub struct SampleFile {
    path: PathBuf,
    name: String,
    attributes: BTreeMap<String, String>,
    schema: SchemaRef,
    num_rows: usize,
    batches: std::result::Result<Vec<RecordBatch>, String>,
}

impl SampleFile {
    pub fn open(path: &Path) -> Result<Self> {
        let container_err = |source| PrepError::Container {
            path: path.to_path_buf(),
            source,
        };

        let file = std::fs::File::open(path).map_err(|e| PrepError::io(path, e))?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(container_err)?;

        let attributes: BTreeMap<String, String> = builder
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .map(|kvs| {
                kvs.iter()
                    .filter_map(|kv| kv.value.as_ref().map(|v| (kv.key.clone(), v.clone())))
                    .collect()
            })
            .unwrap_or_default();
        let schema = builder.schema().clone();
        let num_rows = usize::try_from(builder.metadata().file_metadata().num_rows()).unwrap_or(0);

        let batches = builder
            .build()
            .map_err(|e| e.to_string())
            .and_then(|reader| {
                reader
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = &batches {
            log::debug!("{}: record batches unreadable: {e}", path.display());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            attributes,
            schema,
            num_rows,
            batches,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without the directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.fields().iter().map(|f| f.name().as_str()).collect()
    }

    /// Row count from the footer; available even when the data pages are not.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Whether a column can be read with [`SampleFile::column_f64`].
    pub fn is_numeric_column(&self, name: &str) -> bool {
        self.schema
            .field_with_name(name)
            .map(|f| is_numeric_type(f.data_type()))
            .unwrap_or(false)
    }

    /// All values of a numeric column, concatenated across record batches.
    /// List columns are flattened row by row; nulls inside numeric data
    /// become NaN.
    pub fn column_f64(&self, name: &str) -> anyhow::Result<Vec<f64>> {
        let idx = self
            .schema
            .index_of(name)
            .map_err(|_| anyhow::anyhow!("{}: missing '{name}' column", self.name))?;
        let batches = self
            .batches
            .as_ref()
            .map_err(|e| anyhow::anyhow!("{}: failed to decode record batches: {e}", self.name))?;

        let mut values = Vec::new();
        for batch in batches {
            append_f64_values(batch.column(idx), &mut values)
                .with_context(|| format!("{}: failed to read '{name}'", self.name))?;
        }
        Ok(values)
    }
}

// -- Arrow helpers --

fn is_numeric_type(dt: &DataType) -> bool {
    match dt {
        DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 => true,
        DataType::List(inner) | DataType::LargeList(inner) => is_numeric_type(inner.data_type()),
        _ => false,
    }
}

fn append_f64_values(col: &ArrayRef, out: &mut Vec<f64>) -> anyhow::Result<()> {
    match col.data_type() {
        DataType::Float64 => {
            let arr = downcast::<Float64Array>(col)?;
            out.extend(arr.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
        DataType::Float32 => {
            let arr = downcast::<Float32Array>(col)?;
            out.extend(arr.iter().map(|v| v.map_or(f64::NAN, f64::from)));
        }
        DataType::Int64 => {
            let arr = downcast::<Int64Array>(col)?;
            out.extend(arr.iter().map(|v| v.map_or(f64::NAN, |i| i as f64)));
        }
        DataType::Int32 => {
            let arr = downcast::<Int32Array>(col)?;
            out.extend(arr.iter().map(|v| v.map_or(f64::NAN, f64::from)));
        }
        DataType::List(_) => {
            let arr = downcast::<ListArray>(col)?;
            for row in 0..arr.len() {
                if arr.is_null(row) {
                    bail!("null value in list column at row {row}");
                }
                append_f64_values(&arr.value(row), out)?;
            }
        }
        DataType::LargeList(_) => {
            let arr = downcast::<LargeListArray>(col)?;
            for row in 0..arr.len() {
                if arr.is_null(row) {
                    bail!("null value in list column at row {row}");
                }
                append_f64_values(&arr.value(row), out)?;
            }
        }
        other => bail!("expected a numeric or list column, got {other:?}"),
    }
    Ok(())
}

fn downcast<T: 'static>(col: &ArrayRef) -> anyhow::Result<&T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array type for {:?}", col.data_type()))
}

// ---------------------------------------------------------------------------
// Writing containers (sample generator and tests)
// ---------------------------------------------------------------------------

/// Write `batch` to `path` as a sample container carrying `attributes` in
/// the file-level key/value metadata.
pub fn write_sample(
    path: &Path,
    batch: &RecordBatch,
    attributes: &[(&str, &str)],
) -> anyhow::Result<()> {
    use parquet::arrow::ArrowWriter;
    use parquet::file::metadata::KeyValue;
    use parquet::file::properties::WriterProperties;

    let kvs = attributes
        .iter()
        .map(|(k, v)| KeyValue::new(k.to_string(), v.to_string()))
        .collect();
    let props = WriterProperties::builder()
        .set_key_value_metadata(Some(kvs))
        .build();

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating parquet writer")?;
    writer.write(batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Builder, ListBuilder, StringArray};
    use arrow::datatypes::{Field, Schema};

    use super::*;

    fn sample_batch() -> RecordBatch {
        let mut features = ListBuilder::new(Float64Builder::new());
        features.values().append_slice(&[1.0, 2.0, 3.0]);
        features.append(true);
        features.values().append_slice(&[4.0]);
        features.append(true);

        let schema = Arc::new(Schema::new(vec![
            Field::new(
                "features",
                DataType::List(Arc::new(Field::new("item", DataType::Float64, true))),
                false,
            ),
            Field::new("energy", DataType::Int32, false),
            Field::new("title", DataType::Utf8, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(features.finish()),
                Arc::new(Int32Array::from(vec![7, 9])),
                Arc::new(StringArray::from(vec!["x", "y"])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn open_reads_attributes_and_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.parquet");
        write_sample(&path, &sample_batch(), &[("genre", "blues")]).unwrap();

        let sample = SampleFile::open(&path).unwrap();
        assert_eq!(sample.name(), "song.parquet");
        assert_eq!(sample.attribute("genre"), Some("blues"));
        assert_eq!(sample.attribute("tempo"), None);
        assert_eq!(sample.num_rows(), 2);
        assert_eq!(sample.column_names(), vec!["features", "energy", "title"]);

        assert_eq!(sample.column_f64("features").unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(sample.column_f64("energy").unwrap(), vec![7.0, 9.0]);
        assert!(sample.is_numeric_column("features"));
        assert!(!sample.is_numeric_column("title"));
    }

    #[test]
    fn non_numeric_or_missing_columns_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.parquet");
        write_sample(&path, &sample_batch(), &[]).unwrap();

        let sample = SampleFile::open(&path).unwrap();
        assert!(sample.column_f64("title").is_err());
        assert!(sample.column_f64("absent").is_err());
    }

    #[test]
    fn garbage_file_is_a_container_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.parquet");
        std::fs::write(&path, b"definitely not parquet").unwrap();

        let err = SampleFile::open(&path).unwrap_err();
        assert!(matches!(err, PrepError::Container { .. }));
    }

    #[test]
    fn damaged_data_page_fails_the_column_read_not_the_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("damaged.parquet");
        write_sample(&path, &sample_batch(), &[("genre", "jazz")]).unwrap();

        // Just past the "PAR1" magic: the first page header. The footer stays intact.
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[4..24].fill(0xFF);
        std::fs::write(&path, &bytes).unwrap();

        let sample = SampleFile::open(&path).unwrap();
        assert_eq!(sample.attribute("genre"), Some("jazz"));
        assert_eq!(sample.num_rows(), 2);
        let err = sample.column_f64("features").unwrap_err();
        assert!(format!("{err:#}").contains("failed to decode record batches"));
    }
}
