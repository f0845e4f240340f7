use std::sync::Arc;

use arrow::{
    array::{
        Array, ArrayRef, Decimal128Array, Decimal256Array, Int16Array, Int32Array, StringArray,
        TimestampMillisecondArray,
    },
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::{NaiveDate, NaiveTime};
use rowcast_arrow::{
    ArrowConvertError, BatchRowReader, BatchRowWriter, field_defs_to_arrow_schema,
};
use rowcast_convert::{RowConverter, TinyIntPolicy};
use rowcast_core::{
    ColumnValue, Decimal, FieldDef, FieldDefs, LogicalTypeRoot, Row, RowReader, RowWriter,
};

fn fields() -> FieldDefs {
    FieldDefs::new(vec![
        FieldDef::new("id", LogicalTypeRoot::Integer, false),
        FieldDef::new("name", LogicalTypeRoot::VarChar, true),
        FieldDef::new("price", LogicalTypeRoot::Decimal, true)
            .with_precision(10)
            .with_scale(2),
        FieldDef::new("day", LogicalTypeRoot::Date, true),
        FieldDef::new("at", LogicalTypeRoot::TimeWithoutTimeZone, true).with_precision(9),
        FieldDef::new("seen", LogicalTypeRoot::TimestampWithoutTimeZone, true).with_precision(3),
        FieldDef::new("doc", LogicalTypeRoot::VarChar, true).with_large_object(true),
    ])
}

fn rows() -> Vec<Row> {
    let day = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    let at = NaiveTime::from_hms_nano_opt(23, 59, 58, 123_456_789).unwrap();
    vec![
        Row::new(vec![
            ColumnValue::int(1),
            ColumnValue::string("first"),
            ColumnValue::decimal(Decimal::new(1050, 2)),
            ColumnValue::date(day),
            ColumnValue::time(at).with_size_hint(9),
            ColumnValue::timestamp(day.and_hms_milli_opt(1, 2, 3, 456).unwrap(), 3),
            ColumnValue::string("a\nb"),
        ]),
        Row::new(vec![
            ColumnValue::int(2),
            ColumnValue::null(),
            ColumnValue::null(),
            ColumnValue::null(),
            ColumnValue::null(),
            ColumnValue::null(),
            ColumnValue::null(),
        ]),
    ]
}

fn write_batch(converter: &RowConverter, schema: Arc<Schema>, rows: &[Row]) -> RecordBatch {
    let mut writer = BatchRowWriter::new(schema, rows.len()).unwrap();
    for row in rows {
        converter.serialize(row, &mut writer).unwrap();
        writer.end_row().unwrap();
    }
    assert_eq!(writer.num_rows(), rows.len());
    writer.finish().unwrap()
}

#[test]
fn rows_round_trip_through_a_record_batch() {
    let converter = RowConverter::new(fields()).unwrap();
    let schema = Arc::new(field_defs_to_arrow_schema(&fields()).unwrap());
    let batch = write_batch(&converter, schema, &rows());

    assert_eq!(batch.num_rows(), 2);
    let ids = batch.column(0).as_any().downcast_ref::<Int32Array>().unwrap();
    assert_eq!(ids.value(0), 1);
    assert_eq!(ids.value(1), 2);
    let prices = batch
        .column(2)
        .as_any()
        .downcast_ref::<Decimal128Array>()
        .unwrap();
    assert_eq!(prices.value(0), 1050);
    assert!(prices.is_null(1));
    let seen = batch
        .column(5)
        .as_any()
        .downcast_ref::<TimestampMillisecondArray>()
        .unwrap();
    assert_eq!(seen.value(0) % 1000, 456);

    let read: Vec<Row> = (0..batch.num_rows())
        .map(|i| converter.deserialize(&BatchRowReader::new(&batch, i)).unwrap())
        .collect();
    assert_eq!(read, rows());
}

#[test]
fn reader_reports_type_mismatch_as_access_error() {
    let schema = Arc::new(Schema::new(vec![Field::new("s", DataType::Utf8, true)]));
    let column: ArrayRef = Arc::new(StringArray::from(vec!["x"]));
    let batch = RecordBatch::try_new(schema, vec![column]).unwrap();
    let reader = BatchRowReader::new(&batch, 0);

    assert_eq!(reader.get_string(0).unwrap(), "x");
    let err = reader.get_i32(0).unwrap_err();
    assert!(err.to_string().contains("Utf8"), "{err}");
    assert!(reader.is_null(1).is_err());
    assert!(BatchRowReader::new(&batch, 5).is_null(0).is_err());
}

#[test]
fn reader_exposes_text_as_a_character_stream() {
    let schema = Arc::new(Schema::new(vec![Field::new("s", DataType::Utf8, true)]));
    let batch = RecordBatch::try_new(
        schema,
        vec![Arc::new(StringArray::from(vec!["l1\r\nl2"])) as ArrayRef],
    )
    .unwrap();
    let reader = BatchRowReader::new(&batch, 0);
    let text = rowcast_core::materialize_text(reader.get_character_stream(0).unwrap()).unwrap();
    assert_eq!(text, "l1\nl2");
}

#[test]
fn writer_requires_every_column_per_row() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("a", DataType::Int32, true),
        Field::new("b", DataType::Utf8, true),
    ]));
    let mut writer = BatchRowWriter::new(schema, 1).unwrap();
    writer.set_i32(0, 1).unwrap();
    // The last value set for a column wins.
    writer.set_i32(0, 2).unwrap();
    assert!(matches!(
        writer.end_row(),
        Err(ArrowConvertError::IncompleteRow { row: 0, column: 1 })
    ));
    writer.set_null(1, LogicalTypeRoot::VarChar).unwrap();
    writer.end_row().unwrap();
    let batch = writer.finish().unwrap();
    assert_eq!(batch.num_rows(), 1);
    let a = batch.column(0).as_any().downcast_ref::<Int32Array>().unwrap();
    assert_eq!(a.value(0), 2);
    assert!(batch.column(1).is_null(0));
}

#[test]
fn writer_recovers_after_a_failed_row() {
    let fields = FieldDefs::new(vec![
        FieldDef::new("a", LogicalTypeRoot::Integer, true),
        FieldDef::new("b", LogicalTypeRoot::Integer, true),
    ]);
    let converter = RowConverter::new(fields.clone()).unwrap();
    let schema = Arc::new(field_defs_to_arrow_schema(&fields).unwrap());
    let mut writer = BatchRowWriter::new(schema, 2).unwrap();

    let bad = Row::new(vec![ColumnValue::int(1), ColumnValue::bytes(b"x")]);
    assert!(converter.serialize(&bad, &mut writer).is_err());
    // Nothing from the failed row reaches the batch.
    let good = Row::new(vec![ColumnValue::int(2), ColumnValue::int(3)]);
    converter.serialize(&good, &mut writer).unwrap();
    writer.end_row().unwrap();

    assert!(converter.serialize(&bad, &mut writer).is_err());
    writer.discard_row();
    assert!(matches!(
        writer.end_row(),
        Err(ArrowConvertError::IncompleteRow { row: 1, column: 0 })
    ));
    let batch = writer.finish().unwrap();

    assert_eq!(batch.num_rows(), 1);
    let a = batch.column(0).as_any().downcast_ref::<Int32Array>().unwrap();
    let b = batch.column(1).as_any().downcast_ref::<Int32Array>().unwrap();
    assert_eq!((a.value(0), b.value(0)), (2, 3));
}

#[test]
fn wide_decimals_round_trip_through_decimal256() {
    let fields = FieldDefs::new(vec![
        FieldDef::new("d", LogicalTypeRoot::Decimal, true)
            .with_precision(41)
            .with_scale(1),
    ]);
    let converter = RowConverter::new(fields.clone()).unwrap();
    let schema = Arc::new(field_defs_to_arrow_schema(&fields).unwrap());
    let wide: Decimal = "-1234567890123456789012345678901234567890.5".parse().unwrap();
    let rows = vec![
        Row::new(vec![ColumnValue::decimal(wide.clone())]),
        Row::new(vec![ColumnValue::null()]),
    ];
    let batch = write_batch(&converter, schema, &rows);

    let col = batch.column(0).as_any().downcast_ref::<Decimal256Array>().unwrap();
    assert!(col.is_null(1));
    let read = converter.deserialize(&BatchRowReader::new(&batch, 0)).unwrap();
    assert_eq!(read[0].as_decimal().unwrap(), Some(wide));
}

#[test]
fn decimal_beyond_column_precision_is_rejected() {
    let schema = Arc::new(Schema::new(vec![Field::new(
        "d",
        DataType::Decimal128(5, 2),
        true,
    )]));
    let mut writer = BatchRowWriter::new(schema, 1).unwrap();
    let err = writer.set_decimal(0, Decimal::new(1234567, 2)).unwrap_err();
    assert!(err.to_string().contains("precision 5"), "{err}");
    writer.set_decimal(0, Decimal::new(12345, 2)).unwrap();
    writer.end_row().unwrap();
    let batch = writer.finish().unwrap();
    let col = batch.column(0).as_any().downcast_ref::<Decimal128Array>().unwrap();
    assert_eq!(col.value(0), 12345);
}

#[test]
fn writer_checks_the_column_type() {
    let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Int16, true)]));
    let mut writer = BatchRowWriter::new(schema, 1).unwrap();
    assert!(writer.set_i8(0, 1).is_err());
    assert!(writer.set_string(0, "x").is_err());
    assert!(writer.set_i16(0, 300).is_ok());
}

#[test]
fn writer_rejects_unsupported_arrow_types() {
    let schema = Arc::new(Schema::new(vec![Field::new(
        "l",
        DataType::new_list(DataType::Int32, true),
        true,
    )]));
    assert!(matches!(
        BatchRowWriter::new(schema, 1),
        Err(ArrowConvertError::UnsupportedDataType(_))
    ));
}

#[test]
fn unsigned_tiny_int_needs_a_wider_column() {
    let fields = FieldDefs::new(vec![FieldDef::new("u", LogicalTypeRoot::TinyInt, true)]);
    let converter = RowConverter::builder(fields)
        .with_tiny_int_policy(TinyIntPolicy::Unsigned)
        .build()
        .unwrap();
    let schema = Arc::new(Schema::new(vec![Field::new("u", DataType::Int16, true)]));
    let batch = write_batch(&converter, schema, &[Row::new(vec![ColumnValue::small_int(200)])]);
    let col = batch.column(0).as_any().downcast_ref::<Int16Array>().unwrap();
    assert_eq!(col.value(0), 200);
}
