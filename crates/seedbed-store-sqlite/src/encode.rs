//! Conversions between [`Scalar`] and rusqlite's value types.
//!
//! SQLite blobs have no [`Scalar`] counterpart; nothing in the schema stores
//! them, so they decode lossily as text.

use std::sync::Arc;

use rusqlite::types::{Value, ValueRef};
use seedbed_core::{Row, Scalar};

// ─── Scalar → parameter ──────────────────────────────────────────────────────

pub fn encode_scalar(s: &Scalar) -> Value {
  match s {
    Scalar::Null => Value::Null,
    Scalar::Integer(i) => Value::Integer(*i),
    Scalar::Real(r) => Value::Real(*r),
    Scalar::Text(t) => Value::Text(t.clone()),
  }
}

pub fn encode_params(params: &[Scalar]) -> impl rusqlite::Params + '_ {
  rusqlite::params_from_iter(params.iter().map(encode_scalar))
}

// ─── Column value → Scalar ───────────────────────────────────────────────────

pub fn decode_value(v: ValueRef<'_>) -> Scalar {
  match v {
    ValueRef::Null => Scalar::Null,
    ValueRef::Integer(i) => Scalar::Integer(i),
    ValueRef::Real(r) => Scalar::Real(r),
    ValueRef::Text(t) | ValueRef::Blob(t) => {
      Scalar::Text(String::from_utf8_lossy(t).into_owned())
    }
  }
}

// ─── Result sets ─────────────────────────────────────────────────────────────

/// Run a prepared query and materialise every row.
pub fn read_rows(conn: &rusqlite::Connection, sql: &str, params: &[Scalar]) -> rusqlite::Result<Vec<Row>> {
  let mut stmt = conn.prepare(sql)?;
  let columns: Arc<[String]> = stmt
    .column_names()
    .into_iter()
    .map(str::to_owned)
    .collect();
  let width = columns.len();

  let rows = stmt
    .query_map(encode_params(params), |row| {
      let values = (0..width)
        .map(|i| row.get_ref(i).map(decode_value))
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok(Row::new(Arc::clone(&columns), values))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(rows)
}
