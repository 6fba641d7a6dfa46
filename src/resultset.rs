use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{Error, Result};

pub const TIME_COLUMN: &str = "time";
pub const MEASURE_NAME_COLUMN: &str = "measure_name";
pub const MEASURE_DOUBLE_COLUMN: &str = "measure_value::double";
pub const MEASURE_BIGINT_COLUMN: &str = "measure_value::bigint";

/// One column descriptor from the `ColumnInfo` section.
///
/// Timestream emits more fields per descriptor (`Type`, nested column info);
/// only the name participates in positional lookup, the rest is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnInfo {
    #[serde(rename = "Name")]
    pub name: String,
}

/// One value slot in a row.
///
/// Each slot is a tagged union (`ScalarValue`, `ArrayValue`, `RowValue`,
/// `TimeSeriesValue`, `NullValue`). Only the scalar variant is consumed;
/// every other shape reads as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Datum {
    #[serde(rename = "ScalarValue")]
    pub scalar_value: Option<serde_json::Value>,
}

impl Datum {
    /// Scalar payload as text, if present.
    ///
    /// Timestream serializes scalars as JSON strings, but bare numbers are
    /// accepted too. Arrays, objects and explicit nulls read as absent.
    pub fn scalar_text(&self) -> Option<String> {
        match self.scalar_value.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// One result row: typed values positionally aligned with `ColumnInfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct Row {
    #[serde(rename = "Data")]
    pub data: Vec<Datum>,
}

impl Row {
    /// Scalar text at a column position, or `None` when the slot is out of
    /// range or holds an unsupported value shape.
    pub fn scalar_at(&self, position: usize) -> Option<String> {
        self.data.get(position).and_then(Datum::scalar_text)
    }
}

/// A complete query result document.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    #[serde(rename = "ColumnInfo")]
    pub column_info: Vec<ColumnInfo>,
    #[serde(rename = "Rows")]
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(Error::from)
    }
}

/// Mapping from column name to its zero-based position in each row's value
/// array. Built once from `ColumnInfo`, immutable afterwards.
///
/// Duplicate names resolve to the last occurrence's position.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new(columns: &[ColumnInfo]) -> Self {
        let mut positions = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            positions.insert(column.name.clone(), i);
        }
        Self { positions }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Positions of the columns the pivot consumes, resolved and validated once
/// at load time.
///
/// `time` and `measure_name` must exist; at least one of the two measure
/// value columns must exist. Rows are never probed for columns the document
/// does not declare.
#[derive(Debug, Clone, Copy)]
pub struct RequiredColumns {
    pub time: usize,
    pub measure_name: usize,
    pub value_double: Option<usize>,
    pub value_bigint: Option<usize>,
}

impl RequiredColumns {
    pub fn from_index(index: &ColumnIndex) -> Result<Self> {
        let time = index.require(TIME_COLUMN)?;
        let measure_name = index.require(MEASURE_NAME_COLUMN)?;
        let value_double = index.position(MEASURE_DOUBLE_COLUMN);
        let value_bigint = index.position(MEASURE_BIGINT_COLUMN);

        if value_double.is_none() && value_bigint.is_none() {
            return Err(Error::MissingColumn(MEASURE_DOUBLE_COLUMN.to_string()));
        }

        Ok(Self {
            time,
            measure_name,
            value_double,
            value_bigint,
        })
    }
}
