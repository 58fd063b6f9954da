//! SQL identifier validation and quoting.
//!
//! Table and column names are interpolated into generated statements, so they
//! are restricted to plain ASCII identifiers and always double-quoted.

use crate::{Error, Result};

pub fn is_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
    _ => return false,
  }
  chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `users` → `"users"`; anything that is not a plain identifier is rejected.
pub fn quote_ident(name: &str) -> Result<String> {
  if is_identifier(name) {
    Ok(format!("\"{name}\""))
  } else {
    Err(Error::InvalidIdentifier(name.to_owned()))
  }
}
