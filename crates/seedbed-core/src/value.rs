//! Scalar values and materialised result rows.
//!
//! [`Scalar`] mirrors SQLite's storage classes so a value can travel from a
//! generated record to a bound parameter, and back out of a query, without
//! this crate knowing anything about the database driver.

use std::{fmt, sync::Arc};

use crate::{Error, Result};

// ─── Scalar ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
}

impl Scalar {
  /// Name of the storage class, used in type-mismatch errors.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Null => "null",
      Self::Integer(_) => "integer",
      Self::Real(_) => "real",
      Self::Text(_) => "text",
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Self::Integer(i) => Some(*i),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }
}

impl fmt::Display for Scalar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Null => f.write_str("NULL"),
      Self::Integer(i) => write!(f, "{i}"),
      Self::Real(r) => write!(f, "{r}"),
      Self::Text(s) => write!(f, "{s:?}"),
    }
  }
}

impl From<i64> for Scalar {
  fn from(v: i64) -> Self { Self::Integer(v) }
}

impl From<u32> for Scalar {
  fn from(v: u32) -> Self { Self::Integer(i64::from(v)) }
}

impl From<String> for Scalar {
  fn from(v: String) -> Self { Self::Text(v) }
}

impl From<&str> for Scalar {
  fn from(v: &str) -> Self { Self::Text(v.to_owned()) }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

// ─── Row ─────────────────────────────────────────────────────────────────────

/// One row of a query result, in select-list order.
///
/// Column names are shared between all rows of the same result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
  columns: Arc<[String]>,
  values:  Vec<Scalar>,
}

impl Row {
  pub fn new(columns: Arc<[String]>, values: Vec<Scalar>) -> Self {
    debug_assert_eq!(columns.len(), values.len());
    Self { columns, values }
  }

  pub fn columns(&self) -> &[String] { &self.columns }

  pub fn values(&self) -> &[Scalar] { &self.values }

  pub fn len(&self) -> usize { self.values.len() }

  pub fn is_empty(&self) -> bool { self.values.is_empty() }

  /// Look up a value by column name. The first matching column wins.
  pub fn get(&self, column: &str) -> Option<&Scalar> {
    self
      .columns
      .iter()
      .position(|c| c == column)
      .map(|i| &self.values[i])
  }

  fn require(&self, column: &str) -> Result<&Scalar> {
    self
      .get(column)
      .ok_or_else(|| Error::NoSuchColumn(column.to_owned()))
  }

  pub fn get_i64(&self, column: &str) -> Result<i64> {
    let value = self.require(column)?;
    value.as_i64().ok_or_else(|| Error::TypeMismatch {
      column:   column.to_owned(),
      expected: "integer",
      found:    value.kind(),
    })
  }

  /// Like [`Row::get_i64`] but maps SQL `NULL` to `None`.
  pub fn get_opt_i64(&self, column: &str) -> Result<Option<i64>> {
    match self.require(column)? {
      Scalar::Null => Ok(None),
      _ => self.get_i64(column).map(Some),
    }
  }

  pub fn get_str(&self, column: &str) -> Result<&str> {
    let value = self.require(column)?;
    value.as_str().ok_or_else(|| Error::TypeMismatch {
      column:   column.to_owned(),
      expected: "text",
      found:    value.kind(),
    })
  }
}
