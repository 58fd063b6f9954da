//! Core types for the seedbed data generator.
//!
//! This crate has no database dependencies. Records describe
//! themselves as column/value pairs through [`record::Record`]; storage crates
//! turn those values into bound statement parameters.

pub mod error;
pub mod generate;
pub mod record;
pub mod value;

pub use error::{Error, Result};
pub use record::{ReactionLabel, Record};
pub use value::{Row, Scalar};
