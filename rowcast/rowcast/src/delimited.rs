//! Delimited text lines for bulk-load sinks.
//!
//! Each row becomes one line: the fields rendered as text, joined by the
//! field delimiter and closed by the line delimiter. Nulls are written as
//! the null literal. Values are not quoted or escaped; the delimiters must
//! be chosen so they do not occur in the data.

use std::io::Write;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rowcast_convert::RowConverter;
use rowcast_core::{AccessError, Decimal, LogicalTypeRoot, Row, RowWriter};
use tracing::debug;

use crate::error::BatchError;

/// Delimiters and null literal of the line format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedFormat {
    pub field_delimiter: String,
    pub line_delimiter: String,
    pub null_literal: String,
}

impl Default for DelimitedFormat {
    fn default() -> Self {
        Self {
            field_delimiter: "\t".to_string(),
            line_delimiter: "\n".to_string(),
            null_literal: "\\N".to_string(),
        }
    }
}

impl DelimitedFormat {
    pub fn with_field_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.field_delimiter = delimiter.into();
        self
    }

    pub fn with_line_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.line_delimiter = delimiter.into();
        self
    }

    pub fn with_null_literal(mut self, literal: impl Into<String>) -> Self {
        self.null_literal = literal.into();
        self
    }
}

/// [`RowWriter`] rendering rows as delimited lines into `W`.
///
/// Booleans are written as `1`/`0`, binary values as lowercase hex, dates
/// as `YYYY-MM-DD`, times and timestamps with as many fractional digits as
/// they carry.
///
/// Fields are held until [`end_row`](Self::end_row) writes the line, so a
/// row that fails part-way writes nothing. Setting a field twice keeps the
/// last value.
pub struct DelimitedRowWriter<W> {
    out: W,
    format: DelimitedFormat,
    cells: Vec<Option<String>>,
    lines: usize,
}

impl<W: Write> DelimitedRowWriter<W> {
    /// Writer for rows of `width` fields.
    pub fn new(out: W, width: usize, format: DelimitedFormat) -> Self {
        Self {
            out,
            format,
            cells: vec![None; width],
            lines: 0,
        }
    }

    pub fn format(&self) -> &DelimitedFormat {
        &self.format
    }

    /// Number of lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Write the current row as one line; every field must have been set.
    pub fn end_row(&mut self) -> Result<(), AccessError> {
        if let Some(index) = self.cells.iter().position(Option::is_none) {
            return Err(AccessError::new(format!(
                "field {index} was not written in line {}",
                self.lines
            )));
        }
        let mut line = String::new();
        for (index, cell) in self.cells.iter_mut().enumerate() {
            if index > 0 {
                line.push_str(&self.format.field_delimiter);
            }
            line.push_str(cell.take().as_deref().unwrap_or_default());
        }
        line.push_str(&self.format.line_delimiter);
        self.out.write_all(line.as_bytes())?;
        self.lines += 1;
        Ok(())
    }

    /// Drops the fields set for the current line.
    pub fn discard_row(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    pub fn flush(&mut self) -> Result<(), AccessError> {
        Ok(self.out.flush()?)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn put(&mut self, index: usize, text: String) -> Result<(), AccessError> {
        let width = self.cells.len();
        let cell = self.cells.get_mut(index).ok_or_else(|| {
            AccessError::new(format!("field {index} out of range ({width} fields)"))
        })?;
        *cell = Some(text);
        Ok(())
    }
}

impl<W: Write> RowWriter for DelimitedRowWriter<W> {
    fn set_null(&mut self, index: usize, _type_root: LogicalTypeRoot) -> Result<(), AccessError> {
        let literal = self.format.null_literal.clone();
        self.put(index, literal)
    }

    fn set_bool(&mut self, index: usize, v: bool) -> Result<(), AccessError> {
        self.put(index, if v { "1" } else { "0" }.to_string())
    }

    fn set_i8(&mut self, index: usize, v: i8) -> Result<(), AccessError> {
        self.put(index, v.to_string())
    }

    fn set_i16(&mut self, index: usize, v: i16) -> Result<(), AccessError> {
        self.put(index, v.to_string())
    }

    fn set_i32(&mut self, index: usize, v: i32) -> Result<(), AccessError> {
        self.put(index, v.to_string())
    }

    fn set_i64(&mut self, index: usize, v: i64) -> Result<(), AccessError> {
        self.put(index, v.to_string())
    }

    fn set_f32(&mut self, index: usize, v: f32) -> Result<(), AccessError> {
        self.put(index, v.to_string())
    }

    fn set_f64(&mut self, index: usize, v: f64) -> Result<(), AccessError> {
        self.put(index, v.to_string())
    }

    fn set_decimal(&mut self, index: usize, v: Decimal) -> Result<(), AccessError> {
        self.put(index, v.to_string())
    }

    fn set_string(&mut self, index: usize, v: &str) -> Result<(), AccessError> {
        self.put(index, v.to_string())
    }

    fn set_bytes(&mut self, index: usize, v: &[u8]) -> Result<(), AccessError> {
        let hex = v.iter().map(|b| format!("{b:02x}")).collect();
        self.put(index, hex)
    }

    fn set_date(&mut self, index: usize, v: NaiveDate) -> Result<(), AccessError> {
        self.put(index, v.format("%Y-%m-%d").to_string())
    }

    fn set_time(&mut self, index: usize, v: NaiveTime) -> Result<(), AccessError> {
        self.put(index, v.format("%H:%M:%S%.f").to_string())
    }

    fn set_timestamp(&mut self, index: usize, v: NaiveDateTime) -> Result<(), AccessError> {
        self.put(index, v.format("%Y-%m-%d %H:%M:%S%.f").to_string())
    }
}

/// Serialize `rows` as delimited lines into `out`.
///
/// Returns the number of lines written.
pub fn write_delimited<W: Write>(
    converter: &RowConverter,
    rows: &[Row],
    out: W,
    format: DelimitedFormat,
) -> Result<usize, BatchError> {
    debug!(rows = rows.len(), "writing delimited lines");
    let mut writer = DelimitedRowWriter::new(out, converter.len(), format);
    for (row, values) in rows.iter().enumerate() {
        converter
            .serialize(values, &mut writer)
            .map_err(|source| BatchError::Row { row, source })?;
        writer
            .end_row()
            .map_err(|source| BatchError::Line { row, source })?;
    }
    let lines = writer.lines();
    writer.flush().map_err(|source| BatchError::Line {
        row: lines,
        source,
    })?;
    Ok(lines)
}
