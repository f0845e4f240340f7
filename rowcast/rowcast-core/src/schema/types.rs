use std::{
    fmt::{Display, Formatter, Result},
    ops::Deref,
};

/// Root of a logical column type, without its parameters.
///
/// This is the full root set of the table type system. Converters register
/// handling for the scalar roots only; naming any other root in a schema is
/// rejected when a converter is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalTypeRoot {
    Char,
    VarChar,
    Boolean,
    Binary,
    VarBinary,
    Decimal,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,
    Date,
    TimeWithoutTimeZone,
    TimestampWithoutTimeZone,
    TimestampWithTimeZone,
    TimestampWithLocalTimeZone,
    IntervalYearMonth,
    IntervalDayTime,
    Array,
    Multiset,
    Map,
    Row,
    Distinct,
    Structured,
    Raw,
    Symbol,
    Null,
}

impl LogicalTypeRoot {
    /// SQL spelling of the root.
    pub fn type_name(&self) -> &'static str {
        match self {
            LogicalTypeRoot::Char => "CHAR",
            LogicalTypeRoot::VarChar => "VARCHAR",
            LogicalTypeRoot::Boolean => "BOOLEAN",
            LogicalTypeRoot::Binary => "BINARY",
            LogicalTypeRoot::VarBinary => "VARBINARY",
            LogicalTypeRoot::Decimal => "DECIMAL",
            LogicalTypeRoot::TinyInt => "TINYINT",
            LogicalTypeRoot::SmallInt => "SMALLINT",
            LogicalTypeRoot::Integer => "INTEGER",
            LogicalTypeRoot::BigInt => "BIGINT",
            LogicalTypeRoot::Float => "FLOAT",
            LogicalTypeRoot::Double => "DOUBLE",
            LogicalTypeRoot::Date => "DATE",
            LogicalTypeRoot::TimeWithoutTimeZone => "TIME",
            LogicalTypeRoot::TimestampWithoutTimeZone => "TIMESTAMP",
            LogicalTypeRoot::TimestampWithTimeZone => "TIMESTAMP WITH TIME ZONE",
            LogicalTypeRoot::TimestampWithLocalTimeZone => "TIMESTAMP WITH LOCAL TIME ZONE",
            LogicalTypeRoot::IntervalYearMonth => "INTERVAL YEAR TO MONTH",
            LogicalTypeRoot::IntervalDayTime => "INTERVAL DAY TO SECOND",
            LogicalTypeRoot::Array => "ARRAY",
            LogicalTypeRoot::Multiset => "MULTISET",
            LogicalTypeRoot::Map => "MAP",
            LogicalTypeRoot::Row => "ROW",
            LogicalTypeRoot::Distinct => "DISTINCT",
            LogicalTypeRoot::Structured => "STRUCTURED",
            LogicalTypeRoot::Raw => "RAW",
            LogicalTypeRoot::Symbol => "SYMBOL",
            LogicalTypeRoot::Null => "NULL",
        }
    }

    /// Whether the root carries a time-zone (instant) semantic.
    pub fn is_zoned(&self) -> bool {
        matches!(
            self,
            LogicalTypeRoot::TimestampWithTimeZone | LogicalTypeRoot::TimestampWithLocalTimeZone
        )
    }
}

impl Display for LogicalTypeRoot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.type_name())
    }
}

/// One field of a schema descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub type_root: LogicalTypeRoot,
    pub nullable: bool,
    /// Total digits for `DECIMAL`, fractional-second digits for `TIME` and
    /// timestamps, length for text and binary roots.
    pub precision: Option<u32>,
    /// Fractional digits for `DECIMAL`.
    pub scale: Option<i32>,
    /// Text exposed by the source as a character stream (CLOB-style).
    pub large_object: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_root: LogicalTypeRoot, nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_root,
            nullable,
            precision: None,
            scale: None,
            large_object: false,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_scale(mut self, scale: i32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_large_object(mut self, large_object: bool) -> Self {
        self.large_object = large_object;
        self
    }

    /// Type spelled with its parameters, e.g. `DECIMAL(10, 2)`.
    pub fn type_display(&self) -> String {
        let name = self.type_root.type_name();
        match (self.type_root, self.precision, self.scale) {
            (LogicalTypeRoot::Decimal, Some(p), Some(s)) => format!("{name}({p}, {s})"),
            (_, Some(p), _) => format!("{name}({p})"),
            _ => name.to_string(),
        }
    }
}

/// Ordered collection of [`FieldDef`]; position is the field index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDefs(pub Vec<FieldDef>);

impl FieldDefs {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self(fields)
    }

    pub fn as_slice(&self) -> &[FieldDef] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.0.iter()
    }

    /// Position of the first field named `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|f| f.name == name)
    }
}

impl From<Vec<FieldDef>> for FieldDefs {
    fn from(value: Vec<FieldDef>) -> Self {
        Self(value)
    }
}

impl From<FieldDefs> for Vec<FieldDef> {
    fn from(value: FieldDefs) -> Self {
        value.0
    }
}

impl FromIterator<FieldDef> for FieldDefs {
    fn from_iter<I: IntoIterator<Item = FieldDef>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl AsRef<[FieldDef]> for FieldDefs {
    fn as_ref(&self) -> &[FieldDef] {
        self.as_slice()
    }
}

impl Deref for FieldDefs {
    type Target = [FieldDef];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl Display for FieldDefs {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = super::format_field_defs(self.as_slice())?;
        f.write_str(&text)
    }
}
