//! Row sets
//!
//! Rows are decoded into column-ordered mappings of JSON values. Column names
//! are kept exactly as PostgreSQL reports them; use `AS` in the statement for
//! any alias a caller relies on.

use crate::errors::StoreError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row as _, TypeInfo};

/// The full result of one statement. Empty means no match.
pub type RowSet = Vec<Row>;

/// One result row: column name to value, in select-list order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.columns.push((column.into(), value));
    }

    /// Value of the first column with this name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, column: &str) -> Option<bool> {
        self.get(column).and_then(Value::as_bool)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Decode a PostgreSQL row column by column
    pub fn from_pg_row(row: &PgRow) -> Result<Self, StoreError> {
        let mut decoded = Row {
            columns: Vec::with_capacity(row.len()),
        };

        for column in row.columns() {
            let value = decode_column(row, column.ordinal(), column.name(), column.type_info().name())?;
            decoded.push(column.name(), value);
        }

        Ok(decoded)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn decode_column(row: &PgRow, idx: usize, name: &str, type_name: &str) -> Result<Value, StoreError> {
    let decode_err = |e: sqlx::Error| StoreError::Decode {
        column: name.to_string(),
        type_name: type_name.to_string(),
        message: e.to_string(),
    };

    let value = match type_name {
        "BOOL" => row
            .try_get::<Option<bool>, _>(idx)
            .map(|v| v.map(Value::Bool)),
        "INT2" => row
            .try_get::<Option<i16>, _>(idx)
            .map(|v| v.map(Value::from)),
        "INT4" => row
            .try_get::<Option<i32>, _>(idx)
            .map(|v| v.map(Value::from)),
        "INT8" => row
            .try_get::<Option<i64>, _>(idx)
            .map(|v| v.map(Value::from)),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(idx)
            .map(|v| v.map(|f| Value::from(f as f64))),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(idx)
            .map(|v| v.map(Value::from)),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row
            .try_get::<Option<String>, _>(idx)
            .map(|v| v.map(Value::String)),
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(idx)
            .map(|v| v.map(|u| Value::String(u.to_string()))),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)
            .map(|v| v.map(|dt| Value::String(dt.to_rfc3339()))),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(idx)
            .map(|v| v.map(|dt| Value::String(dt.to_string()))),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(idx)
            .map(|v| v.map(|d| Value::String(d.to_string()))),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(idx),
        "BYTEA" => row
            .try_get::<Option<Vec<u8>>, _>(idx)
            .map(|v| v.map(|bytes| Value::Array(bytes.into_iter().map(Value::from).collect()))),
        _ => row
            .try_get::<Option<String>, _>(idx)
            .map(|v| v.map(Value::String)),
    }
    .map_err(decode_err)?;

    Ok(value.unwrap_or(Value::Null))
}
