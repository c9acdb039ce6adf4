//! Error type and classifier for `tabula-store-sqlite`.

use tabula_core::ErrorClass;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Sort a raw SQLite error into the classes the save path cares about.
///
/// Only uniqueness violations are benign here; table creation goes through
/// `IF NOT EXISTS` DDL, so `AlreadyExists` never surfaces from this backend.
pub fn classify(err: &rusqlite::Error) -> ErrorClass {
  match err {
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
    {
      ErrorClass::Duplicate
    }
    _ => ErrorClass::Fatal,
  }
}
