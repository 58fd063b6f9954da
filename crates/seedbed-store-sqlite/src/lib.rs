//! SQLite backend for seedbed: the storage gateway, the bulk loader and the
//! migration engine.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! connection thread without blocking the async runtime.

mod encode;
mod gateway;
mod ident;

pub mod bulk;
pub mod error;
pub mod migrate;
pub mod schema;

pub use bulk::{LoadSummary, insert_batch};
pub use error::{Error, Result};
pub use gateway::{Gateway, GatewayOptions, Session};
pub use migrate::{Migrator, Step, StepState};
