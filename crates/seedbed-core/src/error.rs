//! Error types for `seedbed-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no such column in row: {0:?}")]
  NoSuchColumn(String),

  #[error("column {column:?} holds {found}, expected {expected}")]
  TypeMismatch {
    column:   String,
    expected: &'static str,
    found:    &'static str,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
