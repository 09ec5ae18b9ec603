//! Defines the `Dialect` trait for database-specific SQL syntax.
//!
//! A dialect is the small capability surface the builders query: identifier
//! and literal quoting, LIMIT/OFFSET rendering, placeholder style and the
//! last-insert-id statement. Four backends are provided; callers construct
//! one explicitly (or via [`Driver::dialect`]) and lend it to builders.

use crate::error::{DbalError, DbalResult};
use crate::ident::Ident;
use crate::placeholder::PlaceholderStyle;
use crate::value::Value;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Driver {
    Mysql,
    Pgsql,
    Sqlite,
    Sqlsrv,
}

impl Driver {
    pub const ALL: [Driver; 4] = [Driver::Mysql, Driver::Pgsql, Driver::Sqlite, Driver::Sqlsrv];

    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Mysql => "mysql",
            Driver::Pgsql => "pgsql",
            Driver::Sqlite => "sqlite",
            Driver::Sqlsrv => "sqlsrv",
        }
    }

    /// Construct the dialect for this backend.
    pub fn dialect(self, auto_quote_identifiers: bool) -> Box<dyn Dialect> {
        match self {
            Driver::Mysql => Box::new(MySql::new().with_auto_quote(auto_quote_identifiers)),
            Driver::Pgsql => Box::new(Postgres::new().with_auto_quote(auto_quote_identifiers)),
            Driver::Sqlite => Box::new(Sqlite::new().with_auto_quote(auto_quote_identifiers)),
            Driver::Sqlsrv => Box::new(SqlServer::new().with_auto_quote(auto_quote_identifiers)),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = DbalError;

    fn from_str(s: &str) -> DbalResult<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Driver::ALL
            .into_iter()
            .find(|d| d.as_str() == lower)
            .ok_or_else(|| {
                let names: Vec<&str> = Driver::ALL.iter().map(Driver::as_str).collect();
                DbalError::invalid_spec(format!(
                    "unknown database driver '{s}', expected one of '{}'",
                    names.join("', '")
                ))
            })
    }
}

impl TryFrom<String> for Driver {
    type Error = DbalError;

    fn try_from(s: String) -> DbalResult<Self> {
        s.parse()
    }
}

pub trait Dialect: Send + Sync + fmt::Debug {
    /// The backend this dialect renders for.
    fn driver(&self) -> Driver;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> &'static str;

    /// Opening and closing identifier delimiters.
    ///
    /// - PostgreSQL and SQLite use double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    /// - SQL Server uses brackets: `[my_column]`
    fn identifier_quotes(&self) -> (char, char);

    /// Whether `quote_identifier` quotes at all.
    fn auto_quote_identifiers(&self) -> bool;

    /// How statement parameters are written in SQL sent to this backend.
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::QuestionMark
    }

    /// Wraps an identifier in the dialect's quotation marks.
    ///
    /// Dotted names are quoted segment by segment. When auto-quoting is
    /// disabled the identifier is returned untouched.
    fn quote_identifier(&self, ident: &str) -> String {
        if !self.auto_quote_identifiers() {
            return ident.to_string();
        }
        let (open, close) = self.identifier_quotes();
        Ident::parse(ident).to_sql(open, close)
    }

    /// Escapes and delimits text as a SQL string literal.
    fn quote_text(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('\'');
        for ch in text.chars() {
            match ch {
                '\0' => {}
                '\'' => out.push_str("''"),
                c => out.push(c),
            }
        }
        out.push('\'');
        out
    }

    /// Renders a value for direct inclusion in SQL text.
    ///
    /// Numbers pass through unchanged, as do the placeholder tokens `?` and
    /// `:name`; everything else becomes a string literal. NaN and the
    /// infinities have no SQL literal and render as `NULL`.
    fn quote(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Float(f) if !f.is_finite() => "NULL".to_string(),
            Value::Text(s) if s == "?" || s.starts_with(':') => s.clone(),
            Value::Text(s) => self.quote_text(s),
            other => other.to_plain_string(),
        }
    }

    /// Applies LIMIT/OFFSET to a fully assembled statement.
    ///
    /// An offset of zero is omitted.
    fn render_limit(&self, sql: &str, limit: i64, offset: i64) -> DbalResult<String> {
        let mut out = format!("{sql} LIMIT {limit}");
        if offset != 0 {
            out.push_str(&format!(" OFFSET {offset}"));
        }
        Ok(out)
    }

    /// The statement that reads back the id generated by the last INSERT.
    fn last_insert_id_sql(&self, sequence: Option<&str>) -> DbalResult<String>;
}

#[derive(Debug, Clone)]
pub struct Postgres {
    auto_quote: bool,
}

impl Postgres {
    pub fn new() -> Self {
        Self { auto_quote: true }
    }

    pub fn with_auto_quote(mut self, enabled: bool) -> Self {
        self.auto_quote = enabled;
        self
    }
}

impl Default for Postgres {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for Postgres {
    fn driver(&self) -> Driver {
        Driver::Pgsql
    }

    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    fn auto_quote_identifiers(&self) -> bool {
        self.auto_quote
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        // PostgreSQL uses $1, $2, etc.
        PlaceholderStyle::Numbered
    }

    fn last_insert_id_sql(&self, sequence: Option<&str>) -> DbalResult<String> {
        let seq = match sequence.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => {
                return Err(DbalError::invalid_spec(
                    "a sequence name is required to read the last insert id on PostgreSQL",
                ));
            }
        };
        let seq = if seq.ends_with("_seq") {
            seq.to_string()
        } else {
            format!("{seq}_seq")
        };
        Ok(format!("SELECT currval({})", self.quote_text(&seq)))
    }
}

#[derive(Debug, Clone)]
pub struct MySql {
    auto_quote: bool,
}

impl MySql {
    pub fn new() -> Self {
        Self { auto_quote: true }
    }

    pub fn with_auto_quote(mut self, enabled: bool) -> Self {
        self.auto_quote = enabled;
        self
    }
}

impl Default for MySql {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for MySql {
    fn driver(&self) -> Driver {
        Driver::Mysql
    }

    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn auto_quote_identifiers(&self) -> bool {
        self.auto_quote
    }

    fn quote_text(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('\'');
        for ch in text.chars() {
            match ch {
                '\0' => {}
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                c => out.push(c),
            }
        }
        out.push('\'');
        out
    }

    fn last_insert_id_sql(&self, _sequence: Option<&str>) -> DbalResult<String> {
        Ok("SELECT LAST_INSERT_ID()".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Sqlite {
    auto_quote: bool,
}

impl Sqlite {
    pub fn new() -> Self {
        Self { auto_quote: true }
    }

    pub fn with_auto_quote(mut self, enabled: bool) -> Self {
        self.auto_quote = enabled;
        self
    }
}

impl Default for Sqlite {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for Sqlite {
    fn driver(&self) -> Driver {
        Driver::Sqlite
    }

    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    fn auto_quote_identifiers(&self) -> bool {
        self.auto_quote
    }

    fn last_insert_id_sql(&self, _sequence: Option<&str>) -> DbalResult<String> {
        Ok("SELECT last_insert_rowid()".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct SqlServer {
    auto_quote: bool,
}

impl SqlServer {
    pub fn new() -> Self {
        Self { auto_quote: true }
    }

    pub fn with_auto_quote(mut self, enabled: bool) -> Self {
        self.auto_quote = enabled;
        self
    }
}

impl Default for SqlServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for SqlServer {
    fn driver(&self) -> Driver {
        Driver::Sqlsrv
    }

    fn name(&self) -> &'static str {
        "SQL Server"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn auto_quote_identifiers(&self) -> bool {
        self.auto_quote
    }

    fn render_limit(&self, _sql: &str, _limit: i64, _offset: i64) -> DbalResult<String> {
        Err(DbalError::unsupported("LIMIT is not supported on SQL Server"))
    }

    fn last_insert_id_sql(&self, _sequence: Option<&str>) -> DbalResult<String> {
        Ok("SELECT SCOPE_IDENTITY()".to_string())
    }
}
