use chrono::NaiveDate;
use rowcast::{
    BatchError, ColumnValue, DelimitedFormat, DelimitedRowWriter, Row, RowConverter,
    write_delimited,
};
use rowcast::core::{Decimal, FieldDef, LogicalTypeRoot, RowWriter};

fn converter() -> RowConverter {
    RowConverter::new(vec![
        FieldDef::new("id", LogicalTypeRoot::Integer, false),
        FieldDef::new("ok", LogicalTypeRoot::Boolean, true),
        FieldDef::new("amount", LogicalTypeRoot::Decimal, true)
            .with_precision(8)
            .with_scale(2),
        FieldDef::new("name", LogicalTypeRoot::VarChar, true),
        FieldDef::new("raw", LogicalTypeRoot::Binary, true),
        FieldDef::new("at", LogicalTypeRoot::TimestampWithoutTimeZone, true),
    ])
    .unwrap()
}

fn sample() -> Vec<Row> {
    let at = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_milli_opt(12, 30, 0, 250)
        .unwrap();
    vec![
        Row::new(vec![
            ColumnValue::int(1),
            ColumnValue::boolean(true),
            ColumnValue::decimal(Decimal::new(125, 1)),
            ColumnValue::string("alpha"),
            ColumnValue::bytes([0xca_u8, 0xfe]),
            ColumnValue::timestamp(at, 3),
        ]),
        Row::new(vec![
            ColumnValue::int(2),
            ColumnValue::null(),
            ColumnValue::null(),
            ColumnValue::null(),
            ColumnValue::null(),
            ColumnValue::null(),
        ]),
    ]
}

#[test]
fn default_format_is_tab_separated_with_null_literal() -> Result<(), BatchError> {
    let mut out = Vec::new();
    let lines = write_delimited(&converter(), &sample(), &mut out, DelimitedFormat::default())?;
    assert_eq!(lines, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "1\t1\t12.50\talpha\tcafe\t2024-06-01 12:30:00.250\n\
         2\t\\N\t\\N\t\\N\t\\N\t\\N\n"
    );
    Ok(())
}

#[test]
fn custom_delimiters_and_null_literal() -> Result<(), BatchError> {
    let format = DelimitedFormat::default()
        .with_field_delimiter("|")
        .with_line_delimiter("\r\n")
        .with_null_literal("NULL");
    let mut out = Vec::new();
    write_delimited(&converter(), &sample()[1..], &mut out, format)?;
    assert_eq!(String::from_utf8(out).unwrap(), "2|NULL|NULL|NULL|NULL|NULL\r\n");
    Ok(())
}

#[test]
fn cast_failure_names_the_row() {
    let mut bad = sample();
    bad.push(Row::new(vec![
        ColumnValue::string("three"),
        ColumnValue::null(),
        ColumnValue::null(),
        ColumnValue::null(),
        ColumnValue::null(),
        ColumnValue::null(),
    ]));
    let mut out = Vec::new();
    let err =
        write_delimited(&converter(), &bad, &mut out, DelimitedFormat::default()).unwrap_err();
    assert_eq!(err.row(), Some(2));
    // Earlier rows are already written.
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
}

#[test]
fn writer_requires_every_field() {
    let mut writer = DelimitedRowWriter::new(Vec::new(), 2, DelimitedFormat::default());
    writer.set_i32(0, 7).unwrap();
    assert!(writer.end_row().is_err());
    assert!(writer.set_i32(2, 1).is_err());
    writer.set_date(1, NaiveDate::from_ymd_opt(2000, 2, 29).unwrap()).unwrap();
    writer.end_row().unwrap();
    assert_eq!(writer.lines(), 1);
    assert_eq!(writer.into_inner(), b"7\t2000-02-29\n");
}

#[test]
fn failed_row_leaves_no_partial_line() {
    let converter = converter();
    let format = DelimitedFormat::default();
    let mut writer = DelimitedRowWriter::new(Vec::new(), converter.len(), format);
    let mut bad = sample().remove(1).into_values();
    bad[5] = ColumnValue::bytes([1_u8]);
    assert!(converter.serialize(&Row::new(bad), &mut writer).is_err());
    writer.discard_row();
    assert!(writer.end_row().is_err());

    converter.serialize(&sample()[1], &mut writer).unwrap();
    writer.end_row().unwrap();
    assert_eq!(writer.lines(), 1);
    assert_eq!(writer.into_inner(), b"2\t\\N\t\\N\t\\N\t\\N\t\\N\n");
}

#[test]
fn bytes_render_as_lowercase_hex() {
    let mut writer = DelimitedRowWriter::new(Vec::new(), 1, DelimitedFormat::default());
    writer.set_bytes(0, &[0x00, 0x0f, 0xab, 0xff]).unwrap();
    writer.end_row().unwrap();
    assert_eq!(writer.into_inner(), b"000fabff\n");
}
