//! Error type for `seedbed-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed SQL or a constraint violation reported by SQLite.
  #[error("statement error: {0}")]
  Statement(#[source] rusqlite::Error),

  /// The connection thread is gone or failed to close.
  #[error("connection error: {0}")]
  Connection(#[source] tokio_rusqlite::Error),

  #[error("row decode error: {0}")]
  Decode(#[from] seedbed_core::Error),

  /// A bulk-insert chunk failed and was rolled back.
  #[error("loading chunk {chunk} into {table} failed: {source}")]
  Load {
    table:  String,
    chunk:  usize,
    #[source]
    source: Box<Error>,
  },

  /// A migration step failed and was rolled back.
  #[error("migration step {index} ({name}) failed: {source}")]
  Step {
    index:  usize,
    name:   &'static str,
    #[source]
    source: Box<Error>,
  },

  #[error("migrator halted after step {name} failed")]
  Halted { name: &'static str },

  #[error("no migration step named {0:?}")]
  UnknownStep(String),

  #[error("batch size must be at least 1")]
  InvalidBatchSize,

  #[error("{batch_size} rows of {columns} columns exceed the {max} bound parameter limit")]
  TooManyParameters {
    batch_size: usize,
    columns:    usize,
    max:        usize,
  },

  #[error("an insert needs at least one column")]
  NoColumns,

  #[error("an insert needs at least one record")]
  NoRecords,

  #[error("invalid SQL identifier: {0:?}")]
  InvalidIdentifier(String),

  #[error("record has no value for column {column:?}")]
  MissingColumn { column: String },

  #[error("{0} reactions carry a label outside the reaction type catalog")]
  UnknownReactionLabels(i64),
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self { Self::Statement(e) }
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(e) => Self::Statement(e),
      other => Self::Connection(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
