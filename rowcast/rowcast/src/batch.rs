//! Whole-batch conversion between Arrow `RecordBatch`es and rows.

use arrow::{datatypes::SchemaRef, record_batch::RecordBatch};
use rayon::prelude::*;
use rowcast_arrow::{BatchRowReader, BatchRowWriter};
use rowcast_convert::RowConverter;
use rowcast_core::Row;
use tracing::debug;

use crate::error::BatchError;

/// Deserialize every row of `batch` through one shared converter.
///
/// Rows are converted in parallel. On failure the lowest failing row
/// number is reported.
pub fn read_record_batch(
    converter: &RowConverter,
    batch: &RecordBatch,
) -> Result<Vec<Row>, BatchError> {
    check_columns(converter, batch.num_columns())?;
    debug!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "reading record batch"
    );

    let results: Vec<_> = (0..batch.num_rows())
        .into_par_iter()
        .map(|row| converter.deserialize(&BatchRowReader::new(batch, row)))
        .collect();

    results
        .into_iter()
        .enumerate()
        .map(|(row, result)| result.map_err(|source| BatchError::Row { row, source }))
        .collect()
}

/// Serialize `rows` into a new `RecordBatch` with the given schema.
pub fn write_record_batch(
    converter: &RowConverter,
    rows: &[Row],
    schema: SchemaRef,
) -> Result<RecordBatch, BatchError> {
    check_columns(converter, schema.fields().len())?;
    debug!(rows = rows.len(), "writing record batch");

    let mut writer = BatchRowWriter::new(schema, rows.len())?;
    for (row, values) in rows.iter().enumerate() {
        converter
            .serialize(values, &mut writer)
            .map_err(|source| BatchError::Row { row, source })?;
        writer.end_row()?;
    }
    Ok(writer.finish()?)
}

fn check_columns(converter: &RowConverter, actual: usize) -> Result<(), BatchError> {
    if converter.len() != actual {
        return Err(BatchError::ColumnCount {
            expected: converter.len(),
            actual,
        });
    }
    Ok(())
}
