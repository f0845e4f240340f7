//! Canonical cell value shared by every connector.

use std::{borrow::Cow, fmt, sync::Arc};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::{
    decimal::Decimal,
    error::{CastError, TargetKind},
};

/// Default fractional-second precision of timestamps whose source does not
/// declare one.
pub const DEFAULT_TIMESTAMP_PRECISION: u8 = 6;

/// Largest supported fractional-second precision (nanoseconds).
pub const MAX_TIMESTAMP_PRECISION: u8 = 9;

/// Logical kind of a [`ColumnValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Null,
    Boolean,
    Integer,
    Decimal,
    String,
    Bytes,
    Date,
    Time,
    Timestamp,
    /// A floating-point input. Floats are stored as [`ColumnKind::Decimal`];
    /// this kind only names the source of a failed float conversion.
    Float,
}

impl ColumnKind {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnKind::Null => "null",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Integer => "integer",
            ColumnKind::Decimal => "decimal",
            ColumnKind::String => "string",
            ColumnKind::Bytes => "bytes",
            ColumnKind::Date => "date",
            ColumnKind::Time => "time",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Float => "float",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Underlying datum of a [`ColumnValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    String(Arc<str>),
    Bytes(Arc<[u8]>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp { value: NaiveDateTime, precision: u8 },
}

/// One immutable, kind-tagged cell.
///
/// `as_*` conversions never modify the value; each returns a new target-typed
/// result. The null variant yields `Ok(None)` for every target.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnValue {
    datum: Datum,
    size_hint: usize,
}

impl ColumnValue {
    pub fn null() -> Self {
        Self::with_hint(Datum::Null, 0)
    }

    pub fn boolean(v: bool) -> Self {
        Self::with_hint(Datum::Boolean(v), 1)
    }

    pub fn tiny_int(v: i8) -> Self {
        Self::with_hint(Datum::Integer(i64::from(v)), 1)
    }

    pub fn small_int(v: i16) -> Self {
        Self::with_hint(Datum::Integer(i64::from(v)), 2)
    }

    pub fn int(v: i32) -> Self {
        Self::with_hint(Datum::Integer(i64::from(v)), 4)
    }

    pub fn big_int(v: i64) -> Self {
        Self::with_hint(Datum::Integer(v), 8)
    }

    /// Numeric value holding the shortest decimal that round-trips to `v`.
    pub fn float(v: f32) -> Result<Self, CastError> {
        let d = Decimal::from_f32(v).ok_or_else(|| {
            CastError::new(ColumnKind::Float, TargetKind::Decimal, v.to_string())
        })?;
        Ok(Self::with_hint(Datum::Decimal(d), 4))
    }

    /// Numeric value holding the shortest decimal that round-trips to `v`.
    pub fn double(v: f64) -> Result<Self, CastError> {
        let d = Decimal::from_f64(v).ok_or_else(|| {
            CastError::new(ColumnKind::Float, TargetKind::Decimal, v.to_string())
        })?;
        Ok(Self::with_hint(Datum::Decimal(d), 8))
    }

    pub fn decimal(v: Decimal) -> Self {
        let hint = v.precision() as usize;
        Self::with_hint(Datum::Decimal(v), hint)
    }

    pub fn string(s: impl AsRef<str>) -> Self {
        let s = s.as_ref();
        Self::with_hint(Datum::String(Arc::from(s)), s.len())
    }

    pub fn bytes(b: impl AsRef<[u8]>) -> Self {
        let b = b.as_ref();
        Self::with_hint(Datum::Bytes(Arc::from(b)), b.len())
    }

    pub fn date(v: NaiveDate) -> Self {
        Self::with_hint(Datum::Date(v), 4)
    }

    pub fn time(v: NaiveTime) -> Self {
        Self::with_hint(Datum::Time(v), 8)
    }

    /// Timestamp rendered with `precision` fractional digits (clamped to 9).
    pub fn timestamp(value: NaiveDateTime, precision: u8) -> Self {
        let precision = precision.min(MAX_TIMESTAMP_PRECISION);
        Self::with_hint(Datum::Timestamp { value, precision }, 8)
    }

    /// Same datum with a different size hint.
    pub fn with_size_hint(self, size_hint: usize) -> Self {
        Self {
            datum: self.datum,
            size_hint,
        }
    }

    fn with_hint(datum: Datum, size_hint: usize) -> Self {
        Self { datum, size_hint }
    }

    pub fn datum(&self) -> &Datum {
        &self.datum
    }

    /// Byte-width or precision indicator for downstream type inference.
    /// Informational only.
    pub fn size_hint(&self) -> usize {
        self.size_hint
    }

    pub fn is_null(&self) -> bool {
        matches!(self.datum, Datum::Null)
    }

    pub fn kind(&self) -> ColumnKind {
        match &self.datum {
            Datum::Null => ColumnKind::Null,
            Datum::Boolean(_) => ColumnKind::Boolean,
            Datum::Integer(_) => ColumnKind::Integer,
            Datum::Decimal(_) => ColumnKind::Decimal,
            Datum::String(_) => ColumnKind::String,
            Datum::Bytes(_) => ColumnKind::Bytes,
            Datum::Date(_) => ColumnKind::Date,
            Datum::Time(_) => ColumnKind::Time,
            Datum::Timestamp { .. } => ColumnKind::Timestamp,
        }
    }

    pub fn as_bool(&self) -> Result<Option<bool>, CastError> {
        match &self.datum {
            Datum::Null => Ok(None),
            Datum::Boolean(v) => Ok(Some(*v)),
            Datum::Integer(v) => Ok(Some(*v != 0)),
            Datum::Decimal(v) => Ok(Some(!v.is_zero())),
            Datum::String(s) => parse_bool(s)
                .map(Some)
                .ok_or_else(|| self.cast_error(TargetKind::Bool)),
            _ => Err(self.cast_error(TargetKind::Bool)),
        }
    }

    /// Narrowing keeps the low-order 8 bits of the integral value.
    pub fn as_i8(&self) -> Result<Option<i8>, CastError> {
        Ok(self.integral(TargetKind::I8)?.map(|v| v as i8))
    }

    /// Narrowing keeps the low-order 16 bits of the integral value.
    pub fn as_i16(&self) -> Result<Option<i16>, CastError> {
        Ok(self.integral(TargetKind::I16)?.map(|v| v as i16))
    }

    /// Narrowing keeps the low-order 32 bits of the integral value.
    pub fn as_i32(&self) -> Result<Option<i32>, CastError> {
        Ok(self.integral(TargetKind::I32)?.map(|v| v as i32))
    }

    /// Narrowing keeps the low-order 64 bits of the integral value.
    pub fn as_i64(&self) -> Result<Option<i64>, CastError> {
        Ok(self.integral(TargetKind::I64)?.map(|v| v as i64))
    }

    pub fn as_f32(&self) -> Result<Option<f32>, CastError> {
        match &self.datum {
            Datum::Null => Ok(None),
            Datum::Integer(v) => Ok(Some(*v as f32)),
            Datum::Decimal(v) => Ok(Some(v.to_f32())),
            Datum::String(s) => s
                .trim()
                .parse::<f32>()
                .map(Some)
                .map_err(|_| self.cast_error(TargetKind::F32)),
            _ => Ok(self.integral(TargetKind::F32)?.map(|v| v as f32)),
        }
    }

    pub fn as_f64(&self) -> Result<Option<f64>, CastError> {
        match &self.datum {
            Datum::Null => Ok(None),
            Datum::Integer(v) => Ok(Some(*v as f64)),
            Datum::Decimal(v) => Ok(Some(v.to_f64())),
            Datum::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.cast_error(TargetKind::F64)),
            _ => Ok(self.integral(TargetKind::F64)?.map(|v| v as f64)),
        }
    }

    pub fn as_decimal(&self) -> Result<Option<Decimal>, CastError> {
        match &self.datum {
            Datum::Null => Ok(None),
            Datum::Integer(v) => Ok(Some(Decimal::from(*v))),
            Datum::Decimal(v) => Ok(Some(v.clone())),
            Datum::String(s) => s
                .parse::<Decimal>()
                .map(Some)
                .map_err(|_| self.cast_error(TargetKind::Decimal)),
            _ => Ok(self
                .integral(TargetKind::Decimal)?
                .map(|v| Decimal::new(v, 0))),
        }
    }

    pub fn as_string(&self) -> Result<Option<Cow<'_, str>>, CastError> {
        match &self.datum {
            Datum::Null => Ok(None),
            Datum::String(s) => Ok(Some(Cow::Borrowed(s))),
            Datum::Bytes(b) => std::str::from_utf8(b)
                .map(|s| Some(Cow::Borrowed(s)))
                .map_err(|_| self.cast_error(TargetKind::String)),
            _ => Ok(Some(Cow::Owned(self.to_string()))),
        }
    }

    /// Raw byte view. Only text and byte sequences have one; every other
    /// kind fails regardless of its value.
    pub fn as_bytes(&self) -> Result<Option<Cow<'_, [u8]>>, CastError> {
        match &self.datum {
            Datum::Null => Ok(None),
            Datum::Bytes(b) => Ok(Some(Cow::Borrowed(b))),
            Datum::String(s) => Ok(Some(Cow::Borrowed(s.as_bytes()))),
            _ => Err(self.cast_error(TargetKind::Bytes)),
        }
    }

    pub fn as_date(&self) -> Result<Option<NaiveDate>, CastError> {
        match &self.datum {
            Datum::Null => Ok(None),
            Datum::Date(v) => Ok(Some(*v)),
            Datum::Timestamp { value, .. } => Ok(Some(value.date())),
            Datum::String(s) => parse_date(s)
                .map(Some)
                .ok_or_else(|| self.cast_error(TargetKind::Date)),
            Datum::Integer(_) | Datum::Decimal(_) => {
                Ok(Some(self.epoch_millis(TargetKind::Date)?.date()))
            }
            _ => Err(self.cast_error(TargetKind::Date)),
        }
    }

    pub fn as_time(&self) -> Result<Option<NaiveTime>, CastError> {
        match &self.datum {
            Datum::Null => Ok(None),
            Datum::Time(v) => Ok(Some(*v)),
            Datum::Timestamp { value, .. } => Ok(Some(value.time())),
            Datum::String(s) => parse_time(s)
                .map(Some)
                .ok_or_else(|| self.cast_error(TargetKind::Time)),
            Datum::Integer(_) | Datum::Decimal(_) => {
                Ok(Some(self.epoch_millis(TargetKind::Time)?.time()))
            }
            _ => Err(self.cast_error(TargetKind::Time)),
        }
    }

    pub fn as_timestamp(&self) -> Result<Option<NaiveDateTime>, CastError> {
        match &self.datum {
            Datum::Null => Ok(None),
            Datum::Timestamp { value, .. } => Ok(Some(*value)),
            Datum::Date(v) => Ok(Some(v.and_time(NaiveTime::MIN))),
            Datum::Time(v) => Ok(Some(
                DateTime::<Utc>::UNIX_EPOCH.date_naive().and_time(*v),
            )),
            Datum::String(s) => parse_timestamp(s)
                .map(Some)
                .ok_or_else(|| self.cast_error(TargetKind::Timestamp)),
            Datum::Integer(_) | Datum::Decimal(_) => {
                Ok(Some(self.epoch_millis(TargetKind::Timestamp)?))
            }
            _ => Err(self.cast_error(TargetKind::Timestamp)),
        }
    }

    pub fn cast_error(&self, to: TargetKind) -> CastError {
        CastError::new(self.kind(), to, self.to_string())
    }

    /// Integral view shared by the integer, float and decimal targets.
    ///
    /// Temporal kinds map to epoch milliseconds (milliseconds of day for
    /// times).
    fn integral(&self, to: TargetKind) -> Result<Option<i128>, CastError> {
        match &self.datum {
            Datum::Null => Ok(None),
            Datum::Boolean(v) => Ok(Some(i128::from(*v))),
            Datum::Integer(v) => Ok(Some(i128::from(*v))),
            Datum::Decimal(v) => Ok(Some(v.trunc_wrapping())),
            Datum::String(s) => s
                .parse::<Decimal>()
                .map(|d| Some(d.trunc_wrapping()))
                .map_err(|_| self.cast_error(to)),
            Datum::Bytes(_) => Err(self.cast_error(to)),
            Datum::Date(v) => Ok(Some(i128::from(
                v.and_time(NaiveTime::MIN).and_utc().timestamp_millis(),
            ))),
            Datum::Time(v) => Ok(Some(i128::from(millis_of_day(v)))),
            Datum::Timestamp { value, .. } => {
                Ok(Some(i128::from(value.and_utc().timestamp_millis())))
            }
        }
    }

    fn epoch_millis(&self, to: TargetKind) -> Result<NaiveDateTime, CastError> {
        let millis = self.integral(to)?.unwrap_or_default() as i64;
        DateTime::from_timestamp_millis(millis)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| self.cast_error(to))
    }
}

impl Default for ColumnValue {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.datum {
            Datum::Null => f.write_str("null"),
            Datum::Boolean(v) => write!(f, "{v}"),
            Datum::Integer(v) => write!(f, "{v}"),
            Datum::Decimal(v) => write!(f, "{v}"),
            Datum::String(s) => f.write_str(s),
            Datum::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Datum::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Datum::Time(v) => write!(f, "{}", v.format("%H:%M:%S%.f")),
            Datum::Timestamp { value, precision } => {
                write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S"))?;
                if *precision > 0 {
                    let nanos = format!("{:09}", value.nanosecond() % 1_000_000_000);
                    write!(f, ".{}", &nanos[..usize::from(*precision)])?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for ColumnValue {
    fn from(v: bool) -> Self {
        Self::boolean(v)
    }
}

impl From<i8> for ColumnValue {
    fn from(v: i8) -> Self {
        Self::tiny_int(v)
    }
}

impl From<i16> for ColumnValue {
    fn from(v: i16) -> Self {
        Self::small_int(v)
    }
}

impl From<i32> for ColumnValue {
    fn from(v: i32) -> Self {
        Self::int(v)
    }
}

impl From<i64> for ColumnValue {
    fn from(v: i64) -> Self {
        Self::big_int(v)
    }
}

impl From<Decimal> for ColumnValue {
    fn from(v: Decimal) -> Self {
        Self::decimal(v)
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> Self {
        Self::string(v)
    }
}

impl From<String> for ColumnValue {
    fn from(v: String) -> Self {
        Self::string(v)
    }
}

impl From<Vec<u8>> for ColumnValue {
    fn from(v: Vec<u8>) -> Self {
        Self::bytes(v)
    }
}

impl From<NaiveDate> for ColumnValue {
    fn from(v: NaiveDate) -> Self {
        Self::date(v)
    }
}

impl From<NaiveTime> for ColumnValue {
    fn from(v: NaiveTime) -> Self {
        Self::time(v)
    }
}

impl From<NaiveDateTime> for ColumnValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::timestamp(v, DEFAULT_TIMESTAMP_PRECISION)
    }
}

impl<T> From<Option<T>> for ColumnValue
where
    T: Into<ColumnValue>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or_else(Self::null, Into::into)
    }
}

fn millis_of_day(t: &NaiveTime) -> i64 {
    i64::from(t.num_seconds_from_midnight()) * 1000 + i64::from(t.nanosecond() / 1_000_000)
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    s.parse::<Decimal>().ok().map(|d| !d.is_zero())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(s).map(|ts| ts.date()))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .or_else(|| {
            s.parse::<i64>()
                .ok()
                .and_then(DateTime::from_timestamp_millis)
                .map(|dt| dt.naive_utc())
        })
}
