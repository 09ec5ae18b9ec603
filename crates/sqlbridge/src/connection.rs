//! Database connections.
//!
//! [`Connection`] is the closed set of operations the rest of the crate
//! needs from a live database: run a query, run a statement, transaction
//! control and last-insert-id lookup. Everything else (SELECT building,
//! INSERT/UPDATE/DELETE helpers, single-value queries) is provided on top.
//!
//! [`PgConnection`] implements it on `tokio-postgres`.
//!
//! # Example
//! ```ignore
//! use sqlbridge::{Connection, ConnectionConfig, Params, PgConnection};
//!
//! # async fn demo() -> sqlbridge::DbalResult<()> {
//! let config = ConnectionConfig::from_toml_str(r#"
//!     driver = "pgsql"
//!     dbname = "northwind"
//! "#)?;
//! let conn = PgConnection::connect(&config).await?;
//!
//! let mut select = conn.select();
//! select.from("Orders", "*")?.and_where("ShipCountry", "=", "?")?;
//! let rows = conn
//!     .query_all(&select.build()?, &Params::positional(["France"]), None)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::condition::Condition;
use crate::config::{ConnectionConfig, DriverOptions};
use crate::dialect::{Dialect, Postgres};
use crate::error::{DbalError, DbalResult};
use crate::placeholder::{BoundSql, Params, bind_placeholders};
use crate::result::{FetchMode, FetchedRow, ResultSet};
use crate::select::Select;
use crate::value::Value;
use crate::write::{delete_sql, insert_sql, update_sql};
use std::future::Future;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};

/// Operations a database connection provides.
pub trait Connection: Send + Sync {
    /// The dialect SQL for this connection is rendered in.
    fn dialect(&self) -> &dyn Dialect;

    fn options(&self) -> &DriverOptions;

    /// Run a statement that returns rows.
    ///
    /// `sql` may use `?` or `:name` placeholders matching `params`.
    fn query(
        &self,
        sql: &str,
        params: &Params,
    ) -> impl Future<Output = DbalResult<ResultSet>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(&self, sql: &str, params: &Params) -> impl Future<Output = DbalResult<u64>> + Send;

    /// Run one or more `;`-separated statements without parameters.
    fn execute_batch(&self, sql: &str) -> impl Future<Output = DbalResult<()>> + Send;

    fn begin(&self) -> impl Future<Output = DbalResult<()>> + Send;

    fn commit(&self) -> impl Future<Output = DbalResult<()>> + Send;

    fn rollback(&self) -> impl Future<Output = DbalResult<()>> + Send;

    /// Read the id generated by the last INSERT on this connection.
    ///
    /// PostgreSQL needs the `sequence` the id was drawn from.
    fn last_insert_id(
        &self,
        sequence: Option<&str>,
    ) -> impl Future<Output = DbalResult<Value>> + Send {
        async move {
            let sql = self.dialect().last_insert_id_sql(sequence)?;
            self.query_one(&sql, &Params::None).await
        }
    }

    /// Start a SELECT bound to this connection's dialect.
    fn select(&self) -> Select<'_> {
        Select::new(self.dialect())
    }

    /// Run a query and fetch every row.
    ///
    /// `mode` of `None` uses the connection's configured fetch mode.
    fn query_all(
        &self,
        sql: &str,
        params: &Params,
        mode: Option<FetchMode>,
    ) -> impl Future<Output = DbalResult<Vec<FetchedRow>>> + Send {
        async move {
            let mut rs = self.query(sql, params).await?;
            Ok(rs.fetch_all(mode))
        }
    }

    /// Run a query and return the first column of the first row.
    ///
    /// Returns [`DbalError::NotFound`] when the query yields no rows.
    fn query_one(&self, sql: &str, params: &Params) -> impl Future<Output = DbalResult<Value>> + Send {
        async move {
            let mut rs = self.query(sql, params).await?;
            rs.fetch_column(0)?
                .ok_or_else(|| DbalError::not_found(format!("query returned no rows: {sql}")))
        }
    }

    /// Insert one row; values are bound positionally in `data` order.
    fn insert(
        &self,
        table: &str,
        data: &[(&str, Value)],
    ) -> impl Future<Output = DbalResult<u64>> + Send {
        async move {
            let columns: Vec<&str> = data.iter().map(|(c, _)| *c).collect();
            let sql = insert_sql(self.dialect(), table, &columns)?;
            let params = Params::Positional(data.iter().map(|(_, v)| v.clone()).collect());
            self.execute(&sql, &params).await
        }
    }

    /// Update the rows matching `condition`.
    fn update(
        &self,
        table: &str,
        data: &[(&str, Value)],
        condition: impl Into<Condition> + Send,
    ) -> impl Future<Output = DbalResult<u64>> + Send {
        let condition = condition.into();
        async move {
            let columns: Vec<&str> = data.iter().map(|(c, _)| *c).collect();
            let sql = update_sql(self.dialect(), table, &columns, &condition)?;
            let params = Params::Positional(data.iter().map(|(_, v)| v.clone()).collect());
            self.execute(&sql, &params).await
        }
    }

    /// Delete the rows matching `condition`; an empty raw condition deletes
    /// every row.
    fn delete(
        &self,
        table: &str,
        condition: impl Into<Condition> + Send,
    ) -> impl Future<Output = DbalResult<u64>> + Send {
        let condition = condition.into();
        async move {
            let sql = delete_sql(self.dialect(), table, &condition);
            self.execute(&sql, &Params::None).await
        }
    }
}

/// A PostgreSQL connection on `tokio-postgres`.
pub struct PgConnection {
    client: Client,
    dialect: Postgres,
    options: DriverOptions,
}

impl PgConnection {
    /// Connect with `NoTls` and spawn the connection task.
    pub async fn connect(config: &ConnectionConfig) -> DbalResult<Self> {
        let pg_config = config.to_pg_config()?;
        Self::connect_with(pg_config, config.options.clone()).await
    }

    /// Connect using a PostgreSQL connection URL.
    pub async fn connect_url(database_url: &str, options: DriverOptions) -> DbalResult<Self> {
        let pg_config: tokio_postgres::Config = database_url
            .parse()
            .map_err(|e: tokio_postgres::Error| DbalError::Connection(e.to_string()))?;
        Self::connect_with(pg_config, options).await
    }

    async fn connect_with(pg_config: tokio_postgres::Config, options: DriverOptions) -> DbalResult<Self> {
        let (client, connection) = pg_config
            .connect(NoTls)
            .await
            .map_err(|e| DbalError::Connection(e.to_string()))?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(target: "sqlbridge.sql", error = %e, "postgres connection error");
            }
        });
        Ok(Self::from_client(client, options))
    }

    /// Wrap an already connected client.
    pub fn from_client(client: Client, options: DriverOptions) -> Self {
        Self {
            client,
            dialect: Postgres::new().with_auto_quote(options.auto_quote_identifiers),
            options,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn bind(&self, sql: &str, params: &Params) -> DbalResult<BoundSql> {
        let bound = bind_placeholders(sql, params, self.dialect.placeholder_style())?;
        tracing::debug!(
            target: "sqlbridge.sql",
            sql = %bound.sql,
            params = bound.values.len(),
            "executing"
        );
        Ok(bound)
    }
}

fn param_refs(values: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

impl Connection for PgConnection {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn options(&self) -> &DriverOptions {
        &self.options
    }

    async fn query(&self, sql: &str, params: &Params) -> DbalResult<ResultSet> {
        let bound = self.bind(sql, params)?;
        let stmt = self.client.prepare(&bound.sql).await?;
        let rows = self.client.query(&stmt, &param_refs(&bound.values)).await?;
        ResultSet::from_pg_rows(bound.sql, stmt.columns(), &rows, &self.options)
    }

    async fn execute(&self, sql: &str, params: &Params) -> DbalResult<u64> {
        let bound = self.bind(sql, params)?;
        let affected = self
            .client
            .execute(bound.sql.as_str(), &param_refs(&bound.values))
            .await?;
        Ok(affected)
    }

    async fn execute_batch(&self, sql: &str) -> DbalResult<()> {
        tracing::debug!(target: "sqlbridge.sql", sql = %sql, "executing batch");
        self.client.batch_execute(sql).await?;
        Ok(())
    }

    async fn begin(&self) -> DbalResult<()> {
        self.execute_batch("BEGIN").await
    }

    async fn commit(&self) -> DbalResult<()> {
        self.execute_batch("COMMIT").await
    }

    async fn rollback(&self) -> DbalResult<()> {
        tracing::warn!(target: "sqlbridge.sql", "rolling back transaction");
        self.execute_batch("ROLLBACK").await
    }
}
