//! Homogeneously typed table columns.

use std::fmt;

use serde::Serialize;

/// Storage type of a column, fixed when the header is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Int,
    Float,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Int => write!(f, "integer"),
            ColumnKind::Float => write!(f, "float"),
        }
    }
}

/// A single cell value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Returns the value widened to `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(v) => v as f64,
            Value::Float(v) => v,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            // `{:?}` keeps enough digits to read the value back unchanged.
            Value::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// Column data, one variant per [`ColumnKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl Column {
    /// Creates an empty column of the given kind.
    pub fn empty(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Int => Column::Int(Vec::new()),
            ColumnKind::Float => Column::Float(Vec::new()),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Int(_) => ColumnKind::Int,
            Column::Float(_) => ColumnKind::Float,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value at `row`, or `None` past the end.
    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            Column::Int(v) => v.get(row).copied().map(Value::Int),
            Column::Float(v) => v.get(row).copied().map(Value::Float),
        }
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Column::Int(v) => Some(v),
            Column::Float(_) => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Column::Float(v) => Some(v),
            Column::Int(_) => None,
        }
    }

    /// Copies the column into a float vector, widening integers.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Column::Int(v) => v.iter().map(|&x| x as f64).collect(),
            Column::Float(v) => v.clone(),
        }
    }

    /// Appends a parsed value. The value kind must match the column kind;
    /// an integer pushed onto a float column is widened.
    pub(crate) fn push(&mut self, value: Value) {
        match value {
            Value::Int(x) => match self {
                Column::Int(v) => v.push(x),
                Column::Float(v) => v.push(x as f64),
            },
            Value::Float(x) => {
                if let Column::Int(_) = self {
                    *self = Column::Float(self.to_f64_vec());
                }
                if let Column::Float(v) = self {
                    v.push(x);
                }
            }
        }
    }

    /// Appends all values of `other` to this column.
    ///
    /// Columns of different kinds widen to float.
    pub fn append(&mut self, other: &Column) {
        match (&mut *self, other) {
            (Column::Int(a), Column::Int(b)) => a.extend_from_slice(b),
            (Column::Float(a), Column::Float(b)) => a.extend_from_slice(b),
            (Column::Float(a), Column::Int(b)) => a.extend(b.iter().map(|&x| x as f64)),
            (Column::Int(_), Column::Float(b)) => {
                let mut widened = self.to_f64_vec();
                widened.extend_from_slice(b);
                *self = Column::Float(widened);
            }
        }
    }
}
