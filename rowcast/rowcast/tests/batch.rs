use std::sync::Arc;

use arrow::{
    array::{ArrayRef, Date32Array, Int64Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use rowcast::{
    BatchError, ColumnValue, ConvertError, Row, RowConverter, read_record_batch,
    write_record_batch,
};
use rowcast::arrow::field_defs_to_arrow_schema;
use rowcast::core::{FieldDef, FieldDefs, LogicalTypeRoot};

fn fields() -> FieldDefs {
    FieldDefs::new(vec![
        FieldDef::new("id", LogicalTypeRoot::BigInt, false),
        FieldDef::new("name", LogicalTypeRoot::VarChar, true),
        FieldDef::new("score", LogicalTypeRoot::Double, true),
    ])
}

fn rows(n: i64) -> Vec<Row> {
    (0..n)
        .map(|i| {
            Row::new(vec![
                ColumnValue::big_int(i),
                if i % 3 == 0 {
                    ColumnValue::null()
                } else {
                    ColumnValue::string(format!("row-{i}"))
                },
                ColumnValue::double(i as f64 / 4.0).unwrap(),
            ])
        })
        .collect()
}

#[test]
fn batch_round_trip_keeps_row_order() -> Result<(), BatchError> {
    let converter = RowConverter::new(fields()).unwrap();
    let schema = Arc::new(field_defs_to_arrow_schema(&fields())?);
    let input = rows(500);

    let batch = write_record_batch(&converter, &input, schema)?;
    assert_eq!(batch.num_rows(), 500);
    let ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(ids.value(499), 499);

    let output = read_record_batch(&converter, &batch)?;
    assert_eq!(output, input);
    Ok(())
}

#[test]
fn empty_batch_reads_as_no_rows() -> Result<(), BatchError> {
    let converter = RowConverter::new(fields()).unwrap();
    let schema = Arc::new(field_defs_to_arrow_schema(&fields())?);
    let batch = write_record_batch(&converter, &[], schema)?;
    assert_eq!(batch.num_rows(), 0);
    assert!(read_record_batch(&converter, &batch)?.is_empty());
    Ok(())
}

#[test]
fn read_reports_the_lowest_failing_row() {
    let converter =
        RowConverter::new(vec![FieldDef::new("d", LogicalTypeRoot::Date, true)]).unwrap();
    let schema = Arc::new(Schema::new(vec![Field::new("d", DataType::Date32, true)]));
    // Days beyond the representable calendar range fail in the reader.
    let days: ArrayRef = Arc::new(Date32Array::from(vec![0, 1, i32::MAX, 3, i32::MAX]));
    let batch = RecordBatch::try_new(schema, vec![days]).unwrap();

    let err = read_record_batch(&converter, &batch).unwrap_err();
    assert_eq!(err.row(), Some(2));
    assert!(matches!(
        err,
        BatchError::Row {
            row: 2,
            source: ConvertError::Access { index: 0, .. }
        }
    ));
}

#[test]
fn read_and_write_check_the_column_count() {
    let converter = RowConverter::new(fields()).unwrap();
    let schema = Arc::new(Schema::new(vec![Field::new("d", DataType::Date32, true)]));
    let days: ArrayRef = Arc::new(Date32Array::from(vec![0]));
    let batch = RecordBatch::try_new(schema.clone(), vec![days]).unwrap();

    assert!(matches!(
        read_record_batch(&converter, &batch),
        Err(BatchError::ColumnCount {
            expected: 3,
            actual: 1
        })
    ));
    assert!(matches!(
        write_record_batch(&converter, &rows(1), schema),
        Err(BatchError::ColumnCount { .. })
    ));
}

#[test]
fn write_reports_the_failing_row() {
    let converter =
        RowConverter::new(vec![FieldDef::new("d", LogicalTypeRoot::Date, true)]).unwrap();
    let schema = Arc::new(Schema::new(vec![Field::new("d", DataType::Date32, true)]));
    let input = vec![
        Row::new(vec![ColumnValue::date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())]),
        Row::new(vec![ColumnValue::string("yesterday")]),
    ];
    let err = write_record_batch(&converter, &input, schema).unwrap_err();
    assert_eq!(err.row(), Some(1));
    assert!(err.to_string().starts_with("row 1: field 0 ('d'): cannot cast string to date"));
}
