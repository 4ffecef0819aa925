//! Low-level Parquet column building.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use ndarray::ArrayView2;

use crate::error::IoError;

/// Column names, in schema order.
pub(crate) const COLUMNS: [&str; 4] = ["site", "sample", "time_s", "attenuation_db"];

/// Builds the Arrow schema for attenuation output.
pub(crate) fn build_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(COLUMNS[0], DataType::UInt32, false),
        Field::new(COLUMNS[1], DataType::UInt64, false),
        Field::new(COLUMNS[2], DataType::Float64, false),
        Field::new(COLUMNS[3], DataType::Float64, false),
    ]))
}

/// Converts a `sites × len` slice of a run, starting at sample `start`,
/// into a site-major [`RecordBatch`].
pub(crate) fn to_record_batch(
    values: ArrayView2<'_, f64>,
    start: usize,
    sampling_interval_s: f64,
    schema: &SchemaRef,
) -> Result<RecordBatch, IoError> {
    let (n_sites, len) = values.dim();
    let rows = n_sites * len;
    let mut site = Vec::with_capacity(rows);
    let mut sample = Vec::with_capacity(rows);
    let mut time_s = Vec::with_capacity(rows);
    let mut attenuation = Vec::with_capacity(rows);

    for (s, row) in values.outer_iter().enumerate() {
        let id = u32::try_from(s).map_err(|_| IoError::Validation {
            count: 1,
            details: format!("site index {s} does not fit in u32"),
        })?;
        for (k, &a) in row.iter().enumerate() {
            let idx = start + k;
            site.push(id);
            sample.push(idx as u64);
            time_s.push(idx as f64 * sampling_interval_s);
            attenuation.push(a);
        }
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt32Array::from(site)),
        Arc::new(UInt64Array::from(sample)),
        Arc::new(Float64Array::from(time_s)),
        Arc::new(Float64Array::from(attenuation)),
    ];
    Ok(RecordBatch::try_new(schema.clone(), columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::AsArray;
    use arrow::datatypes::{Float64Type, UInt32Type, UInt64Type};
    use ndarray::array;

    #[test]
    fn schema_columns() {
        let schema = build_schema();
        assert_eq!(schema.fields().len(), 4);
        for (i, name) in COLUMNS.iter().enumerate() {
            assert_eq!(schema.field(i).name(), name);
        }
        assert_eq!(schema.field(0).data_type(), &DataType::UInt32);
        assert_eq!(schema.field(1).data_type(), &DataType::UInt64);
    }

    #[test]
    fn batch_is_site_major() {
        let values = array![[0.0, 1.5, 2.5], [0.0, 0.0, 4.0]];
        let batch = to_record_batch(values.view(), 10, 2.0, &build_schema()).unwrap();
        assert_eq!(batch.num_rows(), 6);

        let site = batch.column(0).as_primitive::<UInt32Type>();
        let sample = batch.column(1).as_primitive::<UInt64Type>();
        let time = batch.column(2).as_primitive::<Float64Type>();
        let att = batch.column(3).as_primitive::<Float64Type>();

        assert_eq!(site.values().to_vec(), vec![0, 0, 0, 1, 1, 1]);
        assert_eq!(sample.values().to_vec(), vec![10, 11, 12, 10, 11, 12]);
        assert_eq!(time.value(2), 24.0);
        assert_eq!(att.value(5), 4.0);
    }

    #[test]
    fn empty_block() {
        let values = ndarray::Array2::<f64>::zeros((2, 0));
        let batch = to_record_batch(values.view(), 0, 1.0, &build_schema()).unwrap();
        assert_eq!(batch.num_rows(), 0);
    }
}
