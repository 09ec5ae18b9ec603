//! INSERT / UPDATE / DELETE statement generation.
//!
//! Generated statements use positional `?` placeholders for every written
//! value; the caller binds the values in column order (see
//! [`Connection::insert`](crate::Connection::insert)).

use crate::condition::Condition;
use crate::dialect::Dialect;
use crate::error::{DbalError, DbalResult};

fn quoted_columns<S: AsRef<str>>(dialect: &dyn Dialect, columns: &[S]) -> DbalResult<Vec<String>> {
    if columns.is_empty() {
        return Err(DbalError::invalid_spec("at least one column is required"));
    }
    Ok(columns
        .iter()
        .map(|c| dialect.quote_identifier(c.as_ref()))
        .collect())
}

fn push_where(sql: &mut String, dialect: &dyn Dialect, condition: &Condition) {
    if condition.is_empty() {
        return;
    }
    sql.push_str(" WHERE ");
    sql.push_str(&condition.to_sql(dialect));
}

/// `INSERT INTO <table>(<col>, ...) VALUES (?, ...)`
pub fn insert_sql<S: AsRef<str>>(dialect: &dyn Dialect, table: &str, columns: &[S]) -> DbalResult<String> {
    let cols = quoted_columns(dialect, columns)?;
    let placeholders = vec!["?"; cols.len()];
    Ok(format!(
        "INSERT INTO {}({}) VALUES ({})",
        dialect.quote_identifier(table),
        cols.join(", "),
        placeholders.join(", ")
    ))
}

/// `UPDATE <table> SET <col> = ?, ...[ WHERE <condition>]`
pub fn update_sql<S: AsRef<str>>(
    dialect: &dyn Dialect,
    table: &str,
    columns: &[S],
    condition: &Condition,
) -> DbalResult<String> {
    let sets: Vec<String> = quoted_columns(dialect, columns)?
        .into_iter()
        .map(|c| format!("{c} = ?"))
        .collect();
    let mut sql = format!(
        "UPDATE {} SET {}",
        dialect.quote_identifier(table),
        sets.join(", ")
    );
    push_where(&mut sql, dialect, condition);
    Ok(sql)
}

/// `DELETE FROM <table>[ WHERE <condition>]`
pub fn delete_sql(dialect: &dyn Dialect, table: &str, condition: &Condition) -> String {
    let mut sql = format!("DELETE FROM {}", dialect.quote_identifier(table));
    push_where(&mut sql, dialect, condition);
    sql
}
