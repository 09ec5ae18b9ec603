//! # sqlbridge
//!
//! A thin multi-dialect SQL layer for MySQL, PostgreSQL, SQLite and SQL Server.
//!
//! ## Features
//!
//! - **SELECT builder**: tables, joins, aliased columns, WHERE/HAVING predicates,
//!   grouping, ordering and pagination rendered into dialect-aware SQL
//! - **Quoting**: identifier and literal quoting per dialect
//! - **Write helpers**: INSERT / UPDATE / DELETE generation with `?` placeholders
//! - **Typed configuration**: driver options validated when they are built
//! - **Connections**: an explicit [`Connection`] interface, implemented for
//!   PostgreSQL on `tokio-postgres`
//!
//! ## Select builder
//!
//! ```ignore
//! use sqlbridge::{Sqlite, Select};
//!
//! let dialect = Sqlite::new();
//! let mut select = Select::new(&dialect);
//! select
//!     .from("Order Details", ["OrderID", "SUM(\"Quantity\") AS TotalUnits"])?
//!     .group_by("OrderID")
//!     .having(("TotalUnits", ">", 20))?;
//!
//! assert_eq!(
//!     select.build()?,
//!     r#"SELECT "OrderID", SUM("Quantity") AS TotalUnits FROM "Order Details" GROUP BY "OrderID" HAVING "TotalUnits" > 20"#
//! );
//! ```
//!
//! SQL is logged with `tracing` under the `sqlbridge.sql` target; install a
//! subscriber to see it.

pub mod condition;
pub mod config;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod ident;
pub mod placeholder;
pub mod result;
pub mod select;
pub mod value;
pub mod write;

pub use condition::{Condition, Connective, Op, Operand, Predicate};
pub use config::{CaseFolding, ConnectionConfig, DriverOptions, NullHandling};
pub use connection::{Connection, PgConnection};
pub use dialect::{Dialect, Driver, MySql, Postgres, SqlServer, Sqlite};
pub use error::{DbalError, DbalResult};
pub use ident::Ident;
pub use placeholder::{BoundSql, Params, PlaceholderStyle, bind_placeholders};
pub use result::{FetchMode, FetchedRow, ResultSet};
pub use select::{ColumnSpec, JoinKind, JoinOn, Select, SortDir, TableSpec};
pub use value::Value;
pub use write::{delete_sql, insert_sql, update_sql};
