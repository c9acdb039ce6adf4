//! Warehouse backend for tabula — lands batches of course records in a
//! remote analytical database without accumulating duplicates.
//!
//! The destination engine has no row-level upsert primitive, so
//! deduplication is expressed as a staging-table-then-merge protocol: the
//! batch is bulk-loaded into a uniquely-named staging table, then a single
//! set-based `MERGE` inserts only the staging rows whose natural key is not
//! already present. Staging tables are retained afterwards so each run's
//! new arrivals can be audited.

pub mod client;
pub mod error;
pub mod merge;
pub mod schema;

mod store;

pub use client::{HttpClient, HttpError, WarehouseClient, WarehouseConfig};
pub use error::{Error, Result};
pub use merge::{KeyColumn, MergeStatement};
pub use schema::{Column, ColumnType, SchemaError, TableSchema};
pub use store::Warehouse;
