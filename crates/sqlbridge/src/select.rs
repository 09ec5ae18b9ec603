//! SELECT statement builder.
//!
//! [`Select`] accumulates the parts of one SELECT statement through a fluent
//! API and renders them on demand with [`Select::build`]. It borrows a
//! [`Dialect`] for identifier/value quoting and LIMIT rendering.
//!
//! Overloaded argument shapes are parsed once at the API boundary:
//! - [`TableSpec`]: `"Products"`, `"Products AS p"` or a single-entry
//!   `{alias: table}` map
//! - [`ColumnSpec`]: `"name"`, `"expr AS alias"` or a single-entry
//!   `{alias: expr}` map
//! - [`JoinOn`]: no condition, a column pair, a `USING` list or raw SQL
//!
//! Every method validates its input before touching builder state, so an
//! `Err` leaves the builder exactly as it was.
//!
//! # Example
//! ```ignore
//! use sqlbridge::{Postgres, Select};
//!
//! let pg = Postgres::new();
//! let mut select = Select::new(&pg);
//! select
//!     .from("Products", ["ProductID", "ProductName"])?
//!     .join("inner", "Suppliers", ["Products.SupplierID", "Suppliers.SupplierID"], "SupplierName")?
//!     .and_where("UnitPrice", ">", 9.99)?
//!     .order_by("ProductName")
//!     .limit(25, 0);
//! let sql = select.build()?;
//! ```

use crate::condition::{Condition, Connective, Operand, Predicate};
use crate::dialect::Dialect;
use crate::error::{DbalError, DbalResult};
use crate::ident::is_expression;
use crate::value::Value;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::str::FromStr;
use std::sync::LazyLock;

/// `<name> AS <alias>`; greedy, so the last ` AS ` wins.
static ALIAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^(.+)\s+AS\s+(.+)$").expect("alias pattern is valid"));

fn split_alias(s: &str) -> (String, Option<String>) {
    match ALIAS.captures(s) {
        Some(caps) => (caps[1].trim().to_string(), Some(caps[2].trim().to_string())),
        None => (s.trim().to_string(), None),
    }
}

fn single_entry<K, V, I>(entries: I, what: &str) -> DbalResult<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut iter = entries.into_iter();
    let (alias, name) = match (iter.next(), iter.next()) {
        (Some((k, v)), None) => (k.into(), v.into()),
        _ => {
            return Err(DbalError::invalid_spec(format!(
                "{what} mapping must have exactly one entry"
            )));
        }
    };
    let alias = alias.trim().to_string();
    if alias.is_empty() {
        return Err(DbalError::invalid_spec(format!(
            "{what} alias for '{name}' must not be empty"
        )));
    }
    Ok((alias, name))
}

// ==================== Input shapes ====================

/// Join type vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Cross,
    Natural,
    Full,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::LeftOuter => "LEFT OUTER",
            JoinKind::Right => "RIGHT",
            JoinKind::RightOuter => "RIGHT OUTER",
            JoinKind::Cross => "CROSS",
            JoinKind::Natural => "NATURAL",
            JoinKind::Full => "FULL",
        }
    }
}

impl AsRef<str> for JoinKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for JoinKind {
    type Err = DbalError;

    fn from_str(s: &str) -> DbalResult<Self> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        match normalized.as_str() {
            "INNER" => Ok(JoinKind::Inner),
            "LEFT" => Ok(JoinKind::Left),
            "LEFT OUTER" => Ok(JoinKind::LeftOuter),
            "RIGHT" => Ok(JoinKind::Right),
            "RIGHT OUTER" => Ok(JoinKind::RightOuter),
            "CROSS" => Ok(JoinKind::Cross),
            "NATURAL" => Ok(JoinKind::Natural),
            "FULL" => Ok(JoinKind::Full),
            _ => Err(DbalError::invalid_spec(format!("invalid join type '{s}'"))),
        }
    }
}

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

impl AsRef<str> for SortDir {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for SortDir {
    type Err = DbalError;

    fn from_str(s: &str) -> DbalResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDir::Asc),
            "DESC" => Ok(SortDir::Desc),
            _ => Err(DbalError::invalid_spec(format!(
                "invalid sort direction '{s}', must be 'ASC' or 'DESC'"
            ))),
        }
    }
}

/// A table reference with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: String,
    pub alias: Option<String>,
}

impl TableSpec {
    /// Parse `"table"` or `"table AS alias"`.
    pub fn parse(s: &str) -> DbalResult<Self> {
        if s.trim().is_empty() {
            return Err(DbalError::invalid_spec("table name must not be empty"));
        }
        let (name, alias) = split_alias(s);
        Ok(Self { name, alias })
    }

    pub fn aliased(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// Build from an `{alias: table}` mapping with exactly one entry.
    pub fn from_map<K, V, I>(entries: I) -> DbalResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let (alias, name) = single_entry(entries, "table")?;
        if name.trim().is_empty() {
            return Err(DbalError::invalid_spec("table name must not be empty"));
        }
        Ok(Self::aliased(alias, name))
    }

    /// The name the table's columns are qualified with.
    pub fn correlation(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Conversion into a [`TableSpec`].
pub trait IntoTableSpec {
    fn into_table_spec(self) -> DbalResult<TableSpec>;
}

impl IntoTableSpec for TableSpec {
    fn into_table_spec(self) -> DbalResult<TableSpec> {
        Ok(self)
    }
}

impl IntoTableSpec for &str {
    fn into_table_spec(self) -> DbalResult<TableSpec> {
        TableSpec::parse(self)
    }
}

impl IntoTableSpec for String {
    fn into_table_spec(self) -> DbalResult<TableSpec> {
        TableSpec::parse(&self)
    }
}

impl IntoTableSpec for &String {
    fn into_table_spec(self) -> DbalResult<TableSpec> {
        TableSpec::parse(self)
    }
}

impl<K: Into<String>, V: Into<String>, S: BuildHasher> IntoTableSpec for HashMap<K, V, S> {
    fn into_table_spec(self) -> DbalResult<TableSpec> {
        TableSpec::from_map(self)
    }
}

impl<K: Into<String>, V: Into<String>> IntoTableSpec for BTreeMap<K, V> {
    fn into_table_spec(self) -> DbalResult<TableSpec> {
        TableSpec::from_map(self)
    }
}

impl<K: Into<String>, V: Into<String>, S: BuildHasher> IntoTableSpec for IndexMap<K, V, S> {
    fn into_table_spec(self) -> DbalResult<TableSpec> {
        TableSpec::from_map(self)
    }
}

/// A selected column or expression with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub expr: String,
    pub alias: Option<String>,
}

impl ColumnSpec {
    /// Parse `"column"` or `"expr AS alias"`.
    pub fn parse(s: &str) -> DbalResult<Self> {
        if s.trim().is_empty() {
            return Err(DbalError::invalid_spec("column name must not be empty"));
        }
        let (expr, alias) = split_alias(s);
        Ok(Self { expr, alias })
    }

    pub fn aliased(alias: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            alias: Some(alias.into()),
        }
    }

    /// Build from an `{alias: expr}` mapping with exactly one entry.
    pub fn from_map<K, V, I>(entries: I) -> DbalResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let (alias, expr) = single_entry(entries, "column")?;
        if expr.trim().is_empty() {
            return Err(DbalError::invalid_spec("column name must not be empty"));
        }
        Ok(Self::aliased(alias, expr))
    }

    /// `*` and expressions are left as is, anything else is quoted.
    fn to_sql(&self, dialect: &dyn Dialect) -> String {
        let mut sql = if self.expr == "*" || is_expression(&self.expr) {
            self.expr.clone()
        } else {
            dialect.quote_identifier(&self.expr)
        };
        if let Some(alias) = self.alias.as_deref().filter(|a| !a.is_empty()) {
            sql.push_str(" AS ");
            sql.push_str(alias);
        }
        sql
    }
}

/// Conversion into a single [`ColumnSpec`].
pub trait IntoColumnSpec {
    fn into_column_spec(self) -> DbalResult<ColumnSpec>;
}

impl IntoColumnSpec for ColumnSpec {
    fn into_column_spec(self) -> DbalResult<ColumnSpec> {
        Ok(self)
    }
}

impl IntoColumnSpec for &str {
    fn into_column_spec(self) -> DbalResult<ColumnSpec> {
        ColumnSpec::parse(self)
    }
}

impl IntoColumnSpec for String {
    fn into_column_spec(self) -> DbalResult<ColumnSpec> {
        ColumnSpec::parse(&self)
    }
}

impl IntoColumnSpec for &String {
    fn into_column_spec(self) -> DbalResult<ColumnSpec> {
        ColumnSpec::parse(self)
    }
}

/// Conversion into a column list: one column, a sequence, or none.
pub trait IntoColumns {
    fn into_columns(self) -> DbalResult<Vec<ColumnSpec>>;
}

impl IntoColumns for () {
    fn into_columns(self) -> DbalResult<Vec<ColumnSpec>> {
        Ok(Vec::new())
    }
}

impl IntoColumns for ColumnSpec {
    fn into_columns(self) -> DbalResult<Vec<ColumnSpec>> {
        Ok(vec![self])
    }
}

impl IntoColumns for &str {
    fn into_columns(self) -> DbalResult<Vec<ColumnSpec>> {
        Ok(vec![ColumnSpec::parse(self)?])
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> DbalResult<Vec<ColumnSpec>> {
        Ok(vec![ColumnSpec::parse(&self)?])
    }
}

impl<T: IntoColumnSpec> IntoColumns for Vec<T> {
    fn into_columns(self) -> DbalResult<Vec<ColumnSpec>> {
        self.into_iter().map(IntoColumnSpec::into_column_spec).collect()
    }
}

impl<T: IntoColumnSpec, const N: usize> IntoColumns for [T; N] {
    fn into_columns(self) -> DbalResult<Vec<ColumnSpec>> {
        self.into_iter().map(IntoColumnSpec::into_column_spec).collect()
    }
}

impl<T: IntoColumns> IntoColumns for Option<T> {
    fn into_columns(self) -> DbalResult<Vec<ColumnSpec>> {
        match self {
            Some(cols) => cols.into_columns(),
            None => Ok(Vec::new()),
        }
    }
}

/// How a joined table is connected to the tables before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOn {
    /// No condition (CROSS, NATURAL, or a plain FROM entry).
    None,
    /// `ON <left> = <right>`, both sides quoted.
    Columns(String, String),
    /// `USING (<col>, ...)`, each column quoted.
    Using(Vec<String>),
    /// `ON <sql>`, taken verbatim.
    Raw(String),
}

impl JoinOn {
    /// Parse the sequence form: `["USING", col, ...]` or `[left, right]`.
    pub fn from_parts<S: Into<String>>(parts: impl IntoIterator<Item = S>) -> DbalResult<Self> {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        if parts.first().is_some_and(|p| p == "USING") {
            let cols = parts[1..].to_vec();
            if cols.is_empty() {
                return Err(DbalError::invalid_spec(
                    "USING join condition needs at least one column",
                ));
            }
            return Ok(JoinOn::Using(cols));
        }
        match <[String; 2]>::try_from(parts) {
            Ok([left, right]) => Ok(JoinOn::Columns(left, right)),
            Err(_) => Err(DbalError::invalid_spec(
                "join condition must be a column pair or a USING list",
            )),
        }
    }

    fn to_sql(&self, dialect: &dyn Dialect) -> Option<String> {
        match self {
            JoinOn::None => None,
            JoinOn::Columns(left, right) => Some(format!(
                "ON {} = {}",
                dialect.quote_identifier(left),
                dialect.quote_identifier(right)
            )),
            JoinOn::Using(cols) => {
                let cols: Vec<String> = cols.iter().map(|c| dialect.quote_identifier(c)).collect();
                Some(format!("USING ({})", cols.join(", ")))
            }
            JoinOn::Raw(sql) => Some(format!("ON {sql}")),
        }
    }
}

/// Conversion into a [`JoinOn`].
pub trait IntoJoinOn {
    fn into_join_on(self) -> DbalResult<JoinOn>;
}

impl IntoJoinOn for JoinOn {
    fn into_join_on(self) -> DbalResult<JoinOn> {
        Ok(self)
    }
}

impl IntoJoinOn for () {
    fn into_join_on(self) -> DbalResult<JoinOn> {
        Ok(JoinOn::None)
    }
}

impl IntoJoinOn for &str {
    fn into_join_on(self) -> DbalResult<JoinOn> {
        Ok(JoinOn::Raw(self.to_string()))
    }
}

impl IntoJoinOn for String {
    fn into_join_on(self) -> DbalResult<JoinOn> {
        Ok(JoinOn::Raw(self))
    }
}

impl IntoJoinOn for (&str, &str) {
    fn into_join_on(self) -> DbalResult<JoinOn> {
        Ok(JoinOn::Columns(self.0.to_string(), self.1.to_string()))
    }
}

impl<S: Into<String>> IntoJoinOn for Vec<S> {
    fn into_join_on(self) -> DbalResult<JoinOn> {
        JoinOn::from_parts(self)
    }
}

impl<S: Into<String>, const N: usize> IntoJoinOn for [S; N] {
    fn into_join_on(self) -> DbalResult<JoinOn> {
        JoinOn::from_parts(self)
    }
}

/// Conversion into a list of column names (GROUP BY).
pub trait IntoNames {
    fn into_names(self) -> Vec<String>;
}

impl IntoNames for &str {
    fn into_names(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoNames for String {
    fn into_names(self) -> Vec<String> {
        vec![self]
    }
}

impl<S: Into<String>> IntoNames for Vec<S> {
    fn into_names(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<S: Into<String>, const N: usize> IntoNames for [S; N] {
    fn into_names(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

// ==================== Select ====================

/// A registered FROM or JOIN entry.
#[derive(Debug, Clone)]
struct TableRef {
    /// Quoted table name
    table: String,
    alias: Option<String>,
    join: Option<JoinKind>,
    /// Rendered `ON ...` / `USING (...)`
    condition: Option<String>,
}

impl TableRef {
    fn table_sql(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {alias}", self.table),
            None => self.table.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct SelectedColumn {
    /// Rendered column, including any `AS alias`
    sql: String,
    /// Alias, or the quoted table name for unaliased tables
    correlation: String,
}

/// Fluent SELECT statement builder bound to a dialect.
#[derive(Debug, Clone)]
pub struct Select<'d> {
    dialect: &'d dyn Dialect,
    distinct: bool,
    columns: Vec<SelectedColumn>,
    /// Keyed by correlation name, in insertion order
    tables: IndexMap<String, TableRef>,
    /// WHERE fragments, each after the first carrying its connective
    wheres: Vec<String>,
    group: Vec<String>,
    having: Vec<String>,
    order: Vec<String>,
    limit: Option<(i64, i64)>,
}

impl<'d> Select<'d> {
    /// Create an empty builder bound to `dialect`.
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            distinct: false,
            columns: Vec::new(),
            tables: IndexMap::new(),
            wheres: Vec::new(),
            group: Vec::new(),
            having: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Set or clear the DISTINCT flag.
    pub fn distinct(&mut self, flag: bool) -> &mut Self {
        self.distinct = flag;
        self
    }

    /// Add a plain FROM table and its columns.
    pub fn from(
        &mut self,
        table: impl IntoTableSpec,
        columns: impl IntoColumns,
    ) -> DbalResult<&mut Self> {
        let table = table.into_table_spec()?;
        let columns = columns.into_columns()?;
        self.register(None, table, JoinOn::None, columns);
        Ok(self)
    }

    /// Add a joined table, its join condition and its columns.
    ///
    /// `kind` is one of INNER, LEFT, LEFT OUTER, RIGHT, RIGHT OUTER, CROSS,
    /// NATURAL or FULL (case-insensitive).
    pub fn join(
        &mut self,
        kind: impl AsRef<str>,
        table: impl IntoTableSpec,
        on: impl IntoJoinOn,
        columns: impl IntoColumns,
    ) -> DbalResult<&mut Self> {
        let kind: JoinKind = kind.as_ref().parse()?;
        let table = table.into_table_spec()?;
        let on = on.into_join_on()?;
        let columns = columns.into_columns()?;
        self.register(Some(kind), table, on, columns);
        Ok(self)
    }

    /// Register a validated table entry. Re-registering a correlation keeps
    /// the first entry but still appends the columns.
    fn register(
        &mut self,
        kind: Option<JoinKind>,
        table: TableSpec,
        on: JoinOn,
        columns: Vec<ColumnSpec>,
    ) {
        let correlation = table.correlation().to_string();
        let quoted_table = self.dialect.quote_identifier(&table.name);

        if !self.tables.contains_key(&correlation) {
            let condition = on.to_sql(self.dialect);
            self.tables.insert(
                correlation.clone(),
                TableRef {
                    table: quoted_table.clone(),
                    alias: table.alias.clone(),
                    join: kind,
                    condition,
                },
            );
        }

        let qualifier = if table.alias.is_some() {
            correlation
        } else {
            quoted_table
        };
        for column in columns {
            self.columns.push(SelectedColumn {
                sql: column.to_sql(self.dialect),
                correlation: qualifier.clone(),
            });
        }
    }

    // ==================== WHERE ====================

    /// Add a WHERE predicate joined with AND.
    pub fn and_where(
        &mut self,
        column: &str,
        op: impl AsRef<str>,
        data: impl Into<Operand>,
    ) -> DbalResult<&mut Self> {
        self.where_with(column, op, data, Connective::And)
    }

    /// Add a WHERE predicate joined with OR.
    pub fn or_where(
        &mut self,
        column: &str,
        op: impl AsRef<str>,
        data: impl Into<Operand>,
    ) -> DbalResult<&mut Self> {
        self.where_with(column, op, data, Connective::Or)
    }

    /// Add a WHERE predicate with an explicit connective (`"AND"`/`"OR"`).
    ///
    /// The first predicate never carries a connective.
    pub fn where_with(
        &mut self,
        column: &str,
        op: impl AsRef<str>,
        data: impl Into<Operand>,
        connective: impl AsRef<str>,
    ) -> DbalResult<&mut Self> {
        let predicate = Predicate::new(column, op, data)?;
        let fragment = predicate.to_sql(self.dialect);
        push_fragment(&mut self.wheres, fragment, connective.as_ref())?;
        Ok(self)
    }

    // ==================== GROUP BY / HAVING ====================

    /// Append one or more GROUP BY columns.
    pub fn group_by(&mut self, columns: impl IntoNames) -> &mut Self {
        let dialect = self.dialect;
        self.group.extend(
            columns
                .into_names()
                .iter()
                .map(|c| dialect.quote_identifier(c)),
        );
        self
    }

    /// Add a HAVING condition joined with AND.
    pub fn having(&mut self, condition: impl Into<Condition>) -> DbalResult<&mut Self> {
        self.having_with(condition, Connective::And)
    }

    /// Add a HAVING condition joined with OR.
    pub fn or_having(&mut self, condition: impl Into<Condition>) -> DbalResult<&mut Self> {
        self.having_with(condition, Connective::Or)
    }

    /// Add a HAVING condition with an explicit connective.
    ///
    /// `condition` is raw SQL or a `(column, op, value)` triple.
    pub fn having_with(
        &mut self,
        condition: impl Into<Condition>,
        connective: impl AsRef<str>,
    ) -> DbalResult<&mut Self> {
        let fragment = condition.into().to_sql(self.dialect);
        push_fragment(&mut self.having, fragment, connective.as_ref())?;
        Ok(self)
    }

    // ==================== ORDER BY / LIMIT ====================

    /// Append an ORDER BY column with no explicit direction.
    pub fn order_by(&mut self, column: &str) -> &mut Self {
        self.order.push(self.dialect.quote_identifier(column));
        self
    }

    /// Append an ORDER BY column with a direction (`"ASC"`/`"DESC"`).
    pub fn order_by_dir(&mut self, column: &str, dir: impl AsRef<str>) -> DbalResult<&mut Self> {
        let dir: SortDir = dir.as_ref().parse()?;
        let column = self.dialect.quote_identifier(column);
        self.order.push(format!("{column} {}", dir.as_str()));
        Ok(self)
    }

    /// Set LIMIT and OFFSET. An offset of 0 is not rendered.
    pub fn limit(&mut self, limit: i64, offset: i64) -> &mut Self {
        self.limit = Some((limit, offset));
        self
    }

    /// Set LIMIT and OFFSET from loosely typed values.
    ///
    /// Values are truncated toward zero; anything non-numeric counts as 0.
    pub fn limit_values(&mut self, limit: impl Into<Value>, offset: impl Into<Value>) -> &mut Self {
        let limit = limit.into().as_i64().unwrap_or(0);
        let offset = offset.into().as_i64().unwrap_or(0);
        self.limit(limit, offset)
    }

    /// Select page `page` (1-based) of `per_page` rows.
    pub fn limit_page(&mut self, page: i64, per_page: i64) -> &mut Self {
        let offset = per_page.saturating_mul(page.saturating_sub(1));
        self.limit(per_page, offset)
    }

    // ==================== Rendering ====================

    /// Clear every accumulated part. The dialect binding is kept.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::new(self.dialect);
        self
    }

    /// Render the statement.
    ///
    /// Fails only when a LIMIT is set and the dialect cannot express it.
    pub fn build(&self) -> DbalResult<String> {
        let mut sql = String::from("SELECT");
        if self.distinct {
            sql.push_str(" DISTINCT");
        }

        if !self.columns.is_empty() {
            let qualify = self.columns.len() > 1 && self.tables.len() > 1;
            let columns: Vec<String> = self
                .columns
                .iter()
                .map(|c| {
                    if qualify {
                        format!("{}.{}", c.correlation, c.sql)
                    } else {
                        c.sql.clone()
                    }
                })
                .collect();
            sql.push(' ');
            sql.push_str(&columns.join(", "));
        }

        let mut from = Vec::new();
        let mut joins = Vec::new();
        for table in self.tables.values() {
            match table.join {
                None => from.push(table.table_sql()),
                Some(kind) => {
                    let mut join = format!("{} JOIN {}", kind.as_str(), table.table_sql());
                    if let Some(cond) = &table.condition {
                        join.push(' ');
                        join.push_str(cond);
                    }
                    joins.push(join);
                }
            }
        }
        if !from.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&from.join(", "));
        }
        if !joins.is_empty() {
            sql.push(' ');
            sql.push_str(&joins.join("\n"));
        }

        if !self.wheres.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.wheres.join(" "));
        }
        if !self.group.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group.join(", "));
        }
        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having.join(" "));
        }
        if !self.order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order.join(", "));
        }
        if let Some((limit, offset)) = self.limit {
            sql = self.dialect.render_limit(&sql, limit, offset)?;
        }

        tracing::debug!(
            target: "sqlbridge.sql",
            dialect = self.dialect.name(),
            sql = %sql,
            "select built"
        );
        Ok(sql)
    }
}

/// The connective is only parsed once there is a fragment to join to.
fn push_fragment(list: &mut Vec<String>, fragment: String, connective: &str) -> DbalResult<()> {
    if list.is_empty() {
        list.push(fragment);
    } else {
        let connective: Connective = connective.parse()?;
        list.push(format!("{} {fragment}", connective.as_str()));
    }
    Ok(())
}

/// Rendering through `TryFrom` is the same as [`Select::build`], errors
/// included.
impl TryFrom<&Select<'_>> for String {
    type Error = DbalError;

    fn try_from(select: &Select<'_>) -> DbalResult<String> {
        select.build()
    }
}

#[cfg(test)]
mod tests;
