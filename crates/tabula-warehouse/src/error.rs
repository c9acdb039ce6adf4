//! Error type for `tabula-warehouse`.
//!
//! Each phase of the staging-then-merge protocol has its own variant so an
//! operator can tell from the message alone which step of which table's
//! batch failed. Nothing here is retried automatically.

use thiserror::Error;

type ClientError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to serialize row for table {table}: {source}")]
  Serialize {
    table:  String,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to infer schema for table {table}: {reason}")]
  SchemaInference { table: String, reason: String },

  #[error("failed to create table {table}: {source}")]
  CreateTable {
    table:  String,
    #[source]
    source: ClientError,
  },

  #[error("failed to create staging table {table}: {source}")]
  CreateStaging {
    table:  String,
    #[source]
    source: ClientError,
  },

  #[error("failed to load {count} rows into staging table {table}: {source}")]
  Load {
    table:  String,
    count:  usize,
    #[source]
    source: ClientError,
  },

  #[error("failed to execute merge into {table}: {source}")]
  Merge {
    table:  String,
    #[source]
    source: ClientError,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
