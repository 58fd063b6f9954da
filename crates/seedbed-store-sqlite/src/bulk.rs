//! Chunked multi-row inserts.
//!
//! Statement text and parameter order come from [`build_insert`], a pure
//! function; [`insert_batch`] only slices the input and runs one transaction
//! per chunk.

use std::time::Instant;

use seedbed_core::{Record, Scalar};
use tracing::{debug, info};

use crate::{Error, Gateway, Result, ident::quote_ident};

/// Records per chunk when the caller has no better idea.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// SQLite's `SQLITE_MAX_VARIABLE_NUMBER` for the bundled library.
pub const MAX_PARAMETERS: usize = 32_766;

// ─── Statement building ──────────────────────────────────────────────────────

/// A ready-to-run multi-row insert.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
  pub sql:    String,
  /// Flattened record by record, column by column within a record.
  pub params: Vec<Scalar>,
  pub rows:   usize,
}

/// Build `INSERT INTO "t" ("a", "b") VALUES (?, ?), (?, ?), ...` for `records`.
pub fn build_insert<R: Record>(
  table:   &str,
  columns: &[&str],
  records: &[R],
) -> Result<InsertStatement> {
  if columns.is_empty() {
    return Err(Error::NoColumns);
  }
  if records.is_empty() {
    return Err(Error::NoRecords);
  }

  let table_sql = quote_ident(table)?;
  let column_sql = columns
    .iter()
    .map(|c| quote_ident(c))
    .collect::<Result<Vec<_>>>()?
    .join(", ");

  let group = format!("({})", vec!["?"; columns.len()].join(", "));
  let values = vec![group.as_str(); records.len()].join(", ");

  let mut params = Vec::with_capacity(records.len() * columns.len());
  for record in records {
    for column in columns {
      let value = record.value(column).ok_or_else(|| Error::MissingColumn {
        column: (*column).to_owned(),
      })?;
      params.push(value);
    }
  }

  Ok(InsertStatement {
    sql: format!("INSERT INTO {table_sql} ({column_sql}) VALUES {values}"),
    params,
    rows: records.len(),
  })
}

/// Number of chunks `len` records split into: `ceil(len / batch_size)`.
pub fn chunk_count(len: usize, batch_size: usize) -> usize {
  if batch_size == 0 { 0 } else { len.div_ceil(batch_size) }
}

/// Reject batch shapes SQLite would refuse, before any statement runs.
pub fn check_batch_shape(batch_size: usize, columns: usize) -> Result<()> {
  if batch_size == 0 {
    return Err(Error::InvalidBatchSize);
  }
  if columns == 0 {
    return Err(Error::NoColumns);
  }
  if batch_size.saturating_mul(columns) > MAX_PARAMETERS {
    return Err(Error::TooManyParameters {
      batch_size,
      columns,
      max: MAX_PARAMETERS,
    });
  }
  Ok(())
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// What [`insert_batch`] committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
  pub rows:   usize,
  pub chunks: usize,
}

impl std::ops::AddAssign for LoadSummary {
  fn add_assign(&mut self, rhs: Self) {
    self.rows += rhs.rows;
    self.chunks += rhs.chunks;
  }
}

/// Insert `records` into `table`, `batch_size` records per transaction.
///
/// Chunks run strictly in input order. When a chunk fails, that chunk is
/// rolled back, every earlier chunk stays committed, and the error names the
/// failing chunk.
pub async fn insert_batch<R: Record>(
  gateway:    &Gateway,
  table:      &str,
  columns:    &[&str],
  records:    &[R],
  batch_size: usize,
) -> Result<LoadSummary> {
  check_batch_shape(batch_size, columns.len())?;

  let started = Instant::now();
  let total = chunk_count(records.len(), batch_size);
  let mut summary = LoadSummary::default();

  for (chunk, slice) in records.chunks(batch_size).enumerate() {
    let statement = build_insert(table, columns, slice)?;
    let rows = statement.rows;

    gateway
      .transaction(move |session| {
        session.execute(&statement.sql, &statement.params)?;
        Ok(())
      })
      .await
      .map_err(|e| Error::Load {
        table:  table.to_owned(),
        chunk,
        source: Box::new(e),
      })?;

    summary += LoadSummary { rows, chunks: 1 };
    debug!(table, chunk = chunk + 1, of = total, rows, "inserted chunk");
  }

  info!(
    table,
    rows = summary.rows,
    chunks = summary.chunks,
    elapsed_ms = started.elapsed().as_millis() as u64,
    "bulk load finished"
  );
  Ok(summary)
}
