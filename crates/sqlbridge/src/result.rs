//! Buffered statement results.
//!
//! A [`ResultSet`] holds every row returned by one statement, already
//! normalized by the connection's [`DriverOptions`] (column-name case
//! folding and NULL handling), and hands them out through a forward-only
//! cursor in the requested [`FetchMode`].

use crate::config::DriverOptions;
use crate::error::{DbalError, DbalResult};
use crate::value::Value;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tokio_postgres::{Column, Row};
use tokio_postgres::types::Type;

/// Shape of a fetched row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Column name → value, in column order.
    #[default]
    #[serde(alias = "default")]
    Assoc,
    /// Values by position.
    Num,
    /// Both of the above.
    Both,
}

impl FetchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMode::Assoc => "assoc",
            FetchMode::Num => "num",
            FetchMode::Both => "both",
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchMode {
    type Err = DbalError;

    fn from_str(s: &str) -> DbalResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assoc" | "default" => Ok(FetchMode::Assoc),
            "num" => Ok(FetchMode::Num),
            "both" => Ok(FetchMode::Both),
            _ => Err(DbalError::invalid_spec(format!(
                "invalid fetch mode '{s}', expected 'assoc', 'num' or 'both'"
            ))),
        }
    }
}

/// One fetched row.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedRow {
    Assoc(IndexMap<String, Value>),
    Num(Vec<Value>),
    Both {
        named: IndexMap<String, Value>,
        positional: Vec<Value>,
    },
}

impl FetchedRow {
    /// Look a value up by column name (not available in `Num` rows).
    pub fn get(&self, column: &str) -> Option<&Value> {
        match self {
            FetchedRow::Assoc(named) | FetchedRow::Both { named, .. } => named.get(column),
            FetchedRow::Num(_) => None,
        }
    }

    /// Look a value up by position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            FetchedRow::Num(values) | FetchedRow::Both { positional: values, .. } => values.get(index),
            FetchedRow::Assoc(named) => named.get_index(index).map(|(_, v)| v),
        }
    }
}

/// All rows of one executed statement plus a read cursor.
#[derive(Debug, Clone)]
pub struct ResultSet {
    sql: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    fetch_mode: FetchMode,
    cursor: usize,
}

impl ResultSet {
    /// Build a result set, applying the case folding and NULL handling from
    /// `options`.
    pub fn new(
        sql: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
        options: &DriverOptions,
    ) -> Self {
        let columns = columns
            .iter()
            .map(|c| options.case_folding.apply(c))
            .collect();
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| options.null_handling.apply(v)).collect())
            .collect();
        Self {
            sql: sql.into(),
            columns,
            rows,
            fetch_mode: options.fetch_mode,
            cursor: 0,
        }
    }

    /// Decode `tokio-postgres` rows described by a prepared statement's
    /// `columns`.
    pub fn from_pg_rows(
        sql: impl Into<String>,
        columns: &[Column],
        rows: &[Row],
        options: &DriverOptions,
    ) -> DbalResult<Self> {
        let names = columns.iter().map(|c| c.name().to_string()).collect();
        let values = rows
            .iter()
            .map(|row| (0..row.len()).map(|idx| decode_value(row, idx)).collect())
            .collect::<DbalResult<Vec<Vec<Value>>>>()?;
        Ok(Self::new(sql, names, values, options))
    }

    /// The SQL this result came from.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total number of rows returned by the statement.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }

    /// Change the mode used when a fetch call does not name one.
    pub fn set_fetch_mode(&mut self, mode: FetchMode) -> &mut Self {
        self.fetch_mode = mode;
        self
    }

    /// Fetch the next row, or `None` once the cursor is exhausted.
    pub fn fetch_row(&mut self, mode: impl Into<Option<FetchMode>>) -> Option<FetchedRow> {
        let mode = mode.into().unwrap_or(self.fetch_mode);
        let row = self.rows.get(self.cursor)?;
        let fetched = self.shape(row, mode);
        self.cursor += 1;
        Some(fetched)
    }

    /// Fetch every remaining row.
    pub fn fetch_all(&mut self, mode: impl Into<Option<FetchMode>>) -> Vec<FetchedRow> {
        let mode = mode.into().unwrap_or(self.fetch_mode);
        let remaining = self.rows.get(self.cursor..).unwrap_or_default();
        let out = remaining.iter().map(|row| self.shape(row, mode)).collect();
        self.cursor = self.rows.len();
        out
    }

    /// Fetch column `index` of the next row.
    pub fn fetch_column(&mut self, index: usize) -> DbalResult<Option<Value>> {
        if index >= self.columns.len() && !self.rows.is_empty() {
            return Err(DbalError::invalid_spec(format!(
                "column index {index} is out of range for a result with {} column(s)",
                self.columns.len()
            )));
        }
        let Some(row) = self.rows.get(self.cursor) else {
            return Ok(None);
        };
        let value = row.get(index).cloned();
        self.cursor += 1;
        Ok(value)
    }

    /// Discard the remaining rows.
    pub fn close_cursor(&mut self) {
        self.cursor = self.rows.len();
    }

    fn shape(&self, row: &[Value], mode: FetchMode) -> FetchedRow {
        let named = || -> IndexMap<String, Value> {
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect()
        };
        match mode {
            FetchMode::Assoc => FetchedRow::Assoc(named()),
            FetchMode::Num => FetchedRow::Num(row.to_vec()),
            FetchMode::Both => FetchedRow::Both {
                named: named(),
                positional: row.to_vec(),
            },
        }
    }
}

fn decode_value(row: &Row, idx: usize) -> DbalResult<Value> {
    let column = &row.columns()[idx];
    let err = |e: tokio_postgres::Error| DbalError::decode(column.name(), e.to_string());
    let value = match *column.type_() {
        Type::BOOL => row.try_get::<_, Option<bool>>(idx).map_err(err)?.into(),
        Type::INT2 => row.try_get::<_, Option<i16>>(idx).map_err(err)?.into(),
        Type::INT4 => row.try_get::<_, Option<i32>>(idx).map_err(err)?.into(),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx).map_err(err)?.into(),
        Type::OID => row.try_get::<_, Option<u32>>(idx).map_err(err)?.into(),
        Type::FLOAT4 => row.try_get::<_, Option<f32>>(idx).map_err(err)?.into(),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx).map_err(err)?.into(),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            row.try_get::<_, Option<String>>(idx).map_err(err)?.into()
        }
        ref other => {
            return Err(DbalError::decode(
                column.name(),
                format!("unsupported column type '{other}', cast it to text in the query"),
            ));
        }
    };
    Ok(value)
}
