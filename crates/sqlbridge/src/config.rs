//! Connection configuration and driver options.
//!
//! Options are typed and validated when they are constructed: unknown keys
//! and values are rejected with [`DbalError::InvalidSpec`] (or
//! [`DbalError::Config`] when they come from TOML).
//!
//! ```toml
//! driver = "pgsql"
//! dbname = "northwind"
//! host = "localhost"
//! username = "app"
//!
//! [options]
//! fetch_mode = "assoc"
//! case_folding = "lower"
//! null_handling = "natural"
//! auto_quote_identifiers = true
//! ```

use crate::dialect::{Dialect, Driver};
use crate::error::{DbalError, DbalResult};
use crate::result::FetchMode;
use crate::value::Value;
use serde::Deserialize;

/// Case applied to result column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseFolding {
    #[default]
    Natural,
    Lower,
    Upper,
}

impl CaseFolding {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseFolding::Natural => "natural",
            CaseFolding::Lower => "lower",
            CaseFolding::Upper => "upper",
        }
    }

    pub fn apply(&self, name: &str) -> String {
        match self {
            CaseFolding::Natural => name.to_string(),
            CaseFolding::Lower => name.to_lowercase(),
            CaseFolding::Upper => name.to_uppercase(),
        }
    }
}

impl std::str::FromStr for CaseFolding {
    type Err = DbalError;

    fn from_str(s: &str) -> DbalResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "natural" => Ok(CaseFolding::Natural),
            "lower" => Ok(CaseFolding::Lower),
            "upper" => Ok(CaseFolding::Upper),
            _ => Err(DbalError::invalid_spec(format!(
                "invalid case folding '{s}', expected 'natural', 'lower' or 'upper'"
            ))),
        }
    }
}

/// Conversion applied to fetched NULLs and empty strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullHandling {
    #[default]
    Natural,
    /// Empty strings become NULL.
    StringToNull,
    /// NULL becomes an empty string.
    NullToString,
}

impl NullHandling {
    pub fn as_str(&self) -> &'static str {
        match self {
            NullHandling::Natural => "natural",
            NullHandling::StringToNull => "string_to_null",
            NullHandling::NullToString => "null_to_string",
        }
    }

    pub fn apply(&self, value: Value) -> Value {
        match (self, value) {
            (NullHandling::StringToNull, Value::Text(s)) if s.is_empty() => Value::Null,
            (NullHandling::NullToString, Value::Null) => Value::Text(String::new()),
            (_, v) => v,
        }
    }
}

impl std::str::FromStr for NullHandling {
    type Err = DbalError;

    fn from_str(s: &str) -> DbalResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "natural" => Ok(NullHandling::Natural),
            "string_to_null" => Ok(NullHandling::StringToNull),
            "null_to_string" => Ok(NullHandling::NullToString),
            _ => Err(DbalError::invalid_spec(format!(
                "invalid null handling '{s}', expected 'natural', 'string_to_null' or 'null_to_string'"
            ))),
        }
    }
}

/// Per-connection behavior switches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverOptions {
    pub fetch_mode: FetchMode,
    pub case_folding: CaseFolding,
    pub null_handling: NullHandling,
    /// When false, identifiers are emitted exactly as given.
    pub auto_quote_identifiers: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            fetch_mode: FetchMode::Assoc,
            case_folding: CaseFolding::Natural,
            null_handling: NullHandling::Natural,
            auto_quote_identifiers: true,
        }
    }
}

/// Option keys, accepted with or without underscores.
fn option_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('_', "")
}

impl DriverOptions {
    /// Set one option from strings, e.g. `set("case_folding", "upper")`.
    pub fn set(&mut self, key: &str, value: &str) -> DbalResult<&mut Self> {
        match option_key(key).as_str() {
            "fetchmode" => self.fetch_mode = value.parse()?,
            "casefolding" => self.case_folding = value.parse()?,
            "nullhandling" => self.null_handling = value.parse()?,
            "autoquoteidentifiers" => {
                self.auto_quote_identifiers = match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" | "on" => true,
                    "false" | "0" | "off" => false,
                    _ => {
                        return Err(DbalError::invalid_spec(format!(
                            "invalid value '{value}' for auto_quote_identifiers, expected a boolean"
                        )));
                    }
                }
            }
            _ => return Err(DbalError::invalid_spec(format!("unknown driver option '{key}'"))),
        }
        Ok(self)
    }

    /// Read one option back as a string.
    pub fn get(&self, key: &str) -> DbalResult<String> {
        let value = match option_key(key).as_str() {
            "fetchmode" => self.fetch_mode.as_str(),
            "casefolding" => self.case_folding.as_str(),
            "nullhandling" => self.null_handling.as_str(),
            "autoquoteidentifiers" => {
                if self.auto_quote_identifiers {
                    "true"
                } else {
                    "false"
                }
            }
            _ => return Err(DbalError::invalid_spec(format!("unknown driver option '{key}'"))),
        };
        Ok(value.to_string())
    }
}

/// Everything needed to open a connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    pub driver: Driver,
    #[serde(default)]
    pub dbname: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub unix_socket: Option<String>,
    #[serde(default)]
    pub options: DriverOptions,
}

impl ConnectionConfig {
    pub fn new(driver: Driver, dbname: impl Into<String>) -> Self {
        Self {
            driver,
            dbname: dbname.into(),
            host: None,
            port: None,
            username: None,
            password: None,
            unix_socket: None,
            options: DriverOptions::default(),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> DbalResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DbalResult<()> {
        if self.dbname.trim().is_empty() {
            return Err(DbalError::invalid_spec(
                "a database name ('dbname') is required",
            ));
        }
        Ok(())
    }

    /// The dialect for this connection's driver and quoting option.
    pub fn dialect(&self) -> Box<dyn Dialect> {
        self.driver.dialect(self.options.auto_quote_identifiers)
    }

    /// Build a `tokio-postgres` configuration.
    ///
    /// A `unix_socket` directory takes precedence over `host`, which
    /// defaults to `localhost`.
    pub fn to_pg_config(&self) -> DbalResult<tokio_postgres::Config> {
        if self.driver != Driver::Pgsql {
            return Err(DbalError::unsupported(format!(
                "driver '{}' has no native connector, only 'pgsql' can connect",
                self.driver
            )));
        }
        self.validate()?;

        let mut pg = tokio_postgres::Config::new();
        pg.dbname(&self.dbname);
        match (&self.unix_socket, &self.host) {
            (Some(socket), _) => pg.host(socket),
            (None, Some(host)) => pg.host(host),
            (None, None) => pg.host("localhost"),
        };
        if let Some(port) = self.port {
            pg.port(port);
        }
        if let Some(user) = &self.username {
            pg.user(user);
        }
        if let Some(password) = &self.password {
            pg.password(password);
        }
        Ok(pg)
    }
}
