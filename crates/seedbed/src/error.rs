//! Error type for the `seedbed` orchestrator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Settings that no run could succeed with.
  #[error("invalid settings: {0}")]
  Config(String),

  #[error(transparent)]
  Store(#[from] seedbed_store_sqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
