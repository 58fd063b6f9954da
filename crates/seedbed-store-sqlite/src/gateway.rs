//! [`Gateway`]: the single handle through which everything touches SQLite.

use std::{path::Path, time::Duration};

use seedbed_core::{Row, Scalar};
use tracing::{debug, info, warn};

use crate::{
  Result,
  encode::{encode_params, read_rows},
  ident::quote_ident,
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Connection-level settings applied once when the gateway opens.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayOptions {
  /// `PRAGMA synchronous = OFF`: much faster bulk loads, no crash safety.
  pub synchronous_off: bool,
  /// Log every statement and its duration under the `seedbed::sql` target.
  pub profile_sql:     bool,
}

/// Statements longer than this are cut short in profiling output.
const PROFILE_SQL_CHARS: usize = 100;

fn log_statement(sql: &str, elapsed: Duration) {
  let shown = sql
    .char_indices()
    .nth(PROFILE_SQL_CHARS)
    .map_or(sql, |(i, _)| &sql[..i]);
  info!(
    target: "seedbed::sql",
    elapsed_ms = elapsed.as_millis() as u64,
    "{}",
    shown.trim()
  );
}

// ─── Shared statement helpers ────────────────────────────────────────────────

/// Without parameters the text runs as a script (several statements allowed);
/// with parameters it must be exactly one statement.
fn run_statement(
  conn:   &rusqlite::Connection,
  sql:    &str,
  params: &[Scalar],
) -> rusqlite::Result<usize> {
  if params.is_empty() {
    conn.execute_batch(sql)?;
    Ok(0)
  } else {
    conn.execute(sql, encode_params(params))
  }
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// A SQLite database file behind a dedicated connection thread.
///
/// Not `Clone`: there is one owner, and [`Gateway::close`] consumes it.
pub struct Gateway {
  conn: tokio_rusqlite::Connection,
}

impl Gateway {
  /// Open (or create) the database at `path`.
  pub async fn open(path: impl AsRef<Path>, options: &GatewayOptions) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    debug!(path = %path.display(), "opening database");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let gateway = Self { conn };
    gateway.configure(*options).await?;
    Ok(gateway)
  }

  /// Open an in-memory database, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let gateway = Self { conn };
    gateway.configure(GatewayOptions::default()).await?;
    Ok(gateway)
  }

  async fn configure(&self, options: GatewayOptions) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        if options.synchronous_off {
          conn.execute_batch("PRAGMA synchronous = OFF;")?;
        }
        if options.profile_sql {
          conn.profile(Some(log_statement as fn(&str, Duration)));
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a non-query statement, or a script when `params` is empty.
  ///
  /// Returns the number of rows changed; scripts always report 0.
  pub async fn execute(&self, sql: impl Into<String>, params: Vec<Scalar>) -> Result<usize> {
    let sql = sql.into();
    let changed = self
      .conn
      .call(move |conn| Ok(run_statement(conn, &sql, &params)?))
      .await?;
    Ok(changed)
  }

  /// Run a read query and materialise every row in result order.
  pub async fn query(&self, sql: impl Into<String>, params: Vec<Scalar>) -> Result<Vec<Row>> {
    let sql = sql.into();
    let rows = self
      .conn
      .call(move |conn| Ok(read_rows(conn, &sql, &params)?))
      .await?;
    Ok(rows)
  }

  /// Run `body` inside one transaction.
  ///
  /// Commits when `body` returns `Ok`; rolls back and returns the error
  /// otherwise. Transactions do not nest.
  pub async fn transaction<F, R>(&self, body: F) -> Result<R>
  where
    F: FnOnce(&Session<'_>) -> Result<R> + Send + 'static,
    R: Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let outcome = body(&Session { conn: &tx });
        match outcome {
          Ok(value) => {
            tx.commit()?;
            Ok(Ok(value))
          }
          Err(e) => {
            if let Err(rollback) = tx.rollback() {
              warn!(error = %rollback, "rollback failed");
            }
            Ok(Err(e))
          }
        }
      })
      .await?
  }

  /// Close the connection, surfacing any error SQLite reports on close.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    debug!("database closed");
    Ok(())
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// The gateway as seen from inside [`Gateway::transaction`].
///
/// Every statement issued through a session belongs to the surrounding
/// transaction.
pub struct Session<'a> {
  conn: &'a rusqlite::Connection,
}

impl Session<'_> {
  /// See [`Gateway::execute`].
  pub fn execute(&self, sql: &str, params: &[Scalar]) -> Result<usize> {
    Ok(run_statement(self.conn, sql, params)?)
  }

  /// See [`Gateway::query`].
  pub fn query(&self, sql: &str, params: &[Scalar]) -> Result<Vec<Row>> {
    Ok(read_rows(self.conn, sql, params)?)
  }

  /// First column of the first row as an integer, e.g. for `COUNT(*)`.
  pub fn query_i64(&self, sql: &str, params: &[Scalar]) -> Result<i64> {
    let value: i64 = self
      .conn
      .query_row(sql, encode_params(params), |row| row.get(0))?;
    Ok(value)
  }

  /// Column names of `table` in declaration order; empty if it does not exist.
  pub fn table_columns(&self, table: &str) -> Result<Vec<String>> {
    let sql = format!("PRAGMA table_info({})", quote_ident(table)?);
    let mut stmt = self.conn.prepare(&sql)?;
    let names = stmt
      .query_map([], |row| row.get::<_, String>("name"))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
  }

  pub fn has_column(&self, table: &str, column: &str) -> Result<bool> {
    Ok(self.table_columns(table)?.iter().any(|c| c == column))
  }
}
