//! Low-level Parquet reading and column extraction.

use std::collections::BTreeMap;
use std::path::Path;

use arrow::array::{AsArray, RecordBatch};
use arrow::datatypes::{DataType, Float64Type, UInt32Type, UInt64Type};
use ndarray::Array2;
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use tracing::debug;

use crate::error::IoError;
use crate::parquet_write::COLUMNS;
use crate::stored::StoredSeries;

/// Relative tolerance when checking that `time_s` agrees with the inferred
/// sampling interval.
const TIME_TOLERANCE: f64 = 1e-9;

/// Opens a Parquet file as a lazy record batch reader.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened as Parquet.
fn open_batches(path: &Path) -> Result<ParquetRecordBatchReader, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Access {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    Ok(builder.build()?)
}

/// Reads all record batches from a Parquet file.
///
/// # Errors
///
/// Same as [`open_batches`], plus [`IoError::Parquet`] on a read failure.
fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, IoError> {
    let batches = open_batches(path)?.collect::<Result<Vec<_>, _>>()?;
    Ok(batches)
}

/// Visits every `(site, attenuation_db)` row of an attenuation series one
/// record batch at a time, in file order. Returns the number of rows seen.
///
/// Only one batch is held in memory at a time. The sample index and time
/// columns are not checked; use [`read_parquet`] for a validated load.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::Parquet`] | the file is not readable Parquet |
/// | [`IoError::Validation`] | a batch has the wrong schema |
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn scan_parquet<F>(path: &Path, mut visit: F) -> Result<usize, IoError>
where
    F: FnMut(u32, f64),
{
    let mut rows = 0;
    for batch in open_batches(path)? {
        let batch = batch?;
        validate_schema(&batch)?;
        let site = batch.column(0).as_primitive::<UInt32Type>();
        let att = batch.column(3).as_primitive::<Float64Type>();
        for row in 0..batch.num_rows() {
            visit(site.value(row), att.value(row));
        }
        rows += batch.num_rows();
    }
    debug!(rows, "scanned attenuation series");
    Ok(rows)
}

/// Checks column names and types against the attenuation schema.
///
/// # Errors
///
/// Returns [`IoError::Validation`] listing every mismatch.
pub(crate) fn validate_schema(batch: &RecordBatch) -> Result<(), IoError> {
    let schema = batch.schema();
    let expected = [
        DataType::UInt32,
        DataType::UInt64,
        DataType::Float64,
        DataType::Float64,
    ];
    let mut problems = Vec::new();

    if schema.fields().len() != COLUMNS.len() {
        problems.push(format!(
            "expected {} columns, got {}",
            COLUMNS.len(),
            schema.fields().len()
        ));
    }
    for (i, field) in schema.fields().iter().enumerate().take(COLUMNS.len()) {
        if field.name() != COLUMNS[i] {
            problems.push(format!(
                "column {i}: expected '{}', got '{}'",
                COLUMNS[i],
                field.name()
            ));
        } else if field.data_type() != &expected[i] {
            problems.push(format!(
                "column '{}': expected {:?}, got {:?}",
                COLUMNS[i],
                expected[i],
                field.data_type()
            ));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(IoError::Validation {
            count: problems.len(),
            details: problems.join("; "),
        })
    }
}

/// Reads an attenuation series written by [`crate::TimeSeriesWriter`] or
/// [`crate::write_parquet`].
///
/// Rows may appear in any order. Every site must cover the same sample
/// indices `0..n` without gaps or duplicates. The sampling interval is taken
/// from the `time_s` column and checked for consistency.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::Parquet`] | the file is not readable Parquet |
/// | [`IoError::Validation`] | wrong schema, empty file, missing or duplicate samples, inconsistent time column |
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_parquet(path: &Path) -> Result<StoredSeries, IoError> {
    let batches = read_batches(path)?;
    for batch in &batches {
        validate_schema(batch)?;
    }

    let mut by_site: BTreeMap<u32, Vec<(u64, f64, f64)>> = BTreeMap::new();
    for batch in &batches {
        let site = batch.column(0).as_primitive::<UInt32Type>();
        let sample = batch.column(1).as_primitive::<UInt64Type>();
        let time = batch.column(2).as_primitive::<Float64Type>();
        let att = batch.column(3).as_primitive::<Float64Type>();
        for row in 0..batch.num_rows() {
            by_site.entry(site.value(row)).or_default().push((
                sample.value(row),
                time.value(row),
                att.value(row),
            ));
        }
    }

    if by_site.is_empty() {
        return Err(IoError::Validation {
            count: 1,
            details: "file contains no rows".to_string(),
        });
    }

    let n_samples = by_site.values().map(Vec::len).max().unwrap_or(0);
    let mut problems = Vec::new();
    let mut site_ids = Vec::with_capacity(by_site.len());
    let mut values = Array2::<f64>::zeros((by_site.len(), n_samples));
    let mut sampling_interval_s: Option<f64> = None;

    for (row, (id, mut rows)) in by_site.into_iter().enumerate() {
        site_ids.push(id);
        if rows.len() != n_samples {
            problems.push(format!(
                "site {id}: {} samples, expected {n_samples}",
                rows.len()
            ));
            continue;
        }
        rows.sort_by_key(|&(k, _, _)| k);
        if let Some(pos) = rows.iter().enumerate().position(|(k, r)| r.0 != k as u64) {
            problems.push(format!(
                "site {id}: sample index {} at position {pos}",
                rows[pos].0
            ));
            continue;
        }
        if n_samples > 1 {
            let ts = rows[1].1 - rows[0].1;
            let reference = *sampling_interval_s.get_or_insert(ts);
            let consistent = ts > 0.0
                && rows.iter().all(|&(k, t, _)| {
                    (t - k as f64 * reference).abs() <= TIME_TOLERANCE * t.abs().max(1.0)
                });
            if !consistent {
                problems.push(format!("site {id}: time_s not evenly spaced from zero"));
                continue;
            }
        }
        for (k, &(_, _, a)) in rows.iter().enumerate() {
            values[[row, k]] = a;
        }
    }

    if !problems.is_empty() {
        return Err(IoError::Validation {
            count: problems.len(),
            details: problems.join("; "),
        });
    }

    debug!(
        n_sites = site_ids.len(),
        n_samples,
        "read attenuation series"
    );
    Ok(StoredSeries::new(
        site_ids,
        values,
        sampling_interval_s.unwrap_or(0.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, UInt32Array, UInt64Array};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use crate::parquet_write::build_schema;

    fn write_rows(path: &Path, rows: &[(u32, u64, f64, f64)]) {
        let schema = build_schema();
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(UInt32Array::from(rows.iter().map(|r| r.0).collect::<Vec<_>>())),
                Arc::new(UInt64Array::from(rows.iter().map(|r| r.1).collect::<Vec<_>>())),
                Arc::new(Float64Array::from(rows.iter().map(|r| r.2).collect::<Vec<_>>())),
                Arc::new(Float64Array::from(rows.iter().map(|r| r.3).collect::<Vec<_>>())),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn missing_file() {
        let err = read_parquet(Path::new("/nonexistent/series.parquet")).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn unordered_rows_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.parquet");
        write_rows(
            &path,
            &[
                (5, 1, 2.0, 0.5),
                (2, 0, 0.0, 1.0),
                (5, 0, 0.0, 0.0),
                (2, 1, 2.0, 3.0),
            ],
        );
        let stored = read_parquet(&path).unwrap();
        assert_eq!(stored.site_ids(), &[2, 5]);
        assert_eq!(stored.sampling_interval_s(), 2.0);
        assert_eq!(stored.trace(2).unwrap().to_vec(), vec![1.0, 3.0]);
        assert_eq!(stored.trace(5).unwrap().to_vec(), vec![0.0, 0.5]);
    }

    #[test]
    fn gap_in_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gap.parquet");
        write_rows(&path, &[(0, 0, 0.0, 1.0), (0, 2, 2.0, 1.0)]);
        let err = read_parquet(&path).unwrap_err();
        match err {
            IoError::Validation { details, .. } => assert!(details.contains("site 0")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn unequal_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.parquet");
        write_rows(
            &path,
            &[(0, 0, 0.0, 1.0), (0, 1, 1.0, 1.0), (1, 0, 0.0, 1.0)],
        );
        let err = read_parquet(&path).unwrap_err();
        match err {
            IoError::Validation { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("site 1: 1 samples, expected 2"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn uneven_time_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("time.parquet");
        write_rows(
            &path,
            &[(0, 0, 0.0, 1.0), (0, 1, 1.0, 1.0), (0, 2, 5.0, 1.0)],
        );
        let err = read_parquet(&path).unwrap_err();
        assert!(err.to_string().contains("time_s"));
    }

    #[test]
    fn single_sample_has_zero_interval() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.parquet");
        write_rows(&path, &[(0, 0, 0.0, 2.5)]);
        let stored = read_parquet(&path).unwrap();
        assert_eq!(stored.n_samples(), 1);
        assert_eq!(stored.sampling_interval_s(), 0.0);
    }

    #[test]
    fn scan_visits_rows_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.parquet");
        write_rows(
            &path,
            &[
                (1, 0, 0.0, 0.5),
                (0, 0, 0.0, 2.0),
                (1, 1, 1.0, 1.5),
                (0, 1, 1.0, 4.0),
            ],
        );
        let mut seen = Vec::new();
        let rows = scan_parquet(&path, |site, a| seen.push((site, a))).unwrap();
        assert_eq!(rows, 4);
        assert_eq!(seen, vec![(1, 0.5), (0, 2.0), (1, 1.5), (0, 4.0)]);
    }

    #[test]
    fn scan_missing_file() {
        let err = scan_parquet(Path::new("/nonexistent/series.parquet"), |_, _| {}).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn wrong_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.parquet");
        let schema = Arc::new(Schema::new(vec![Field::new(
            "realisation",
            DataType::Int32,
            false,
        )]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Int32Array::from(vec![1, 2]))],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = read_parquet(&path).unwrap_err();
        match err {
            IoError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("expected 4 columns"));
                assert!(details.contains("expected 'site', got 'realisation'"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
