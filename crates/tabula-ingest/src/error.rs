//! Error type for `tabula-ingest`.

use thiserror::Error;

type SourceError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("collector failed for course {course}: {source}")]
  Collect {
    course: String,
    #[source]
    source: SourceError,
  },

  #[error("local save failed for course {course}: {source}")]
  Save {
    course: String,
    #[source]
    source: SourceError,
  },

  #[error("warehouse error: {0}")]
  Warehouse(#[from] tabula_warehouse::Error),

  #[error("failed to open local store: {0}")]
  OpenStore(#[from] tabula_store_sqlite::Error),

  #[error("failed to build warehouse client: {0}")]
  Client(#[from] tabula_warehouse::HttpError),

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
