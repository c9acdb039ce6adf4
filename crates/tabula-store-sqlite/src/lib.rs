//! SQLite backend for the tabula course store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! worker thread without blocking the async runtime. One aggregate is one
//! transaction; duplicate courses are suppressed by a composite unique
//! index over the natural key.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result, classify};
pub use store::{FeatureCounts, SqliteStore};

#[cfg(test)]
mod tests;
