//! Positional container of column values for one record.

use std::{fmt, ops::Index};

use crate::value::ColumnValue;

/// Ordered, fixed-width sequence of [`ColumnValue`]s.
///
/// Index-aligned with the [`FieldDefs`](crate::FieldDefs) of the converter
/// that built it. There is no mutating API: a row is complete when it is
/// handed out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(Vec<ColumnValue>);

impl Row {
    pub fn new(values: Vec<ColumnValue>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ColumnValue> {
        self.0.get(index)
    }

    pub fn values(&self) -> &[ColumnValue] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnValue> {
        self.0.iter()
    }

    pub fn into_values(self) -> Vec<ColumnValue> {
        self.0
    }

    /// Sum of the values' size hints.
    pub fn byte_size(&self) -> usize {
        self.0.iter().map(ColumnValue::size_hint).sum()
    }
}

impl From<Vec<ColumnValue>> for Row {
    fn from(values: Vec<ColumnValue>) -> Self {
        Self(values)
    }
}

impl FromIterator<ColumnValue> for Row {
    fn from_iter<I: IntoIterator<Item = ColumnValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<usize> for Row {
    type Output = ColumnValue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a ColumnValue;
    type IntoIter = std::slice::Iter<'a, ColumnValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}
