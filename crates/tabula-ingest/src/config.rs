//! Runtime configuration, deserialised from a TOML file with `TABULA_*`
//! environment overrides.
//!
//! Project and dataset identifiers are plain configuration passed into the
//! store constructors — there is no process-wide mutable state.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseSettings {
  pub base_url: String,
  pub dataset:  String,
  /// Bearer token; omit for unauthenticated/local deployments.
  pub token:    Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
  /// Path of the local SQLite database file.
  pub store_path: PathBuf,
  pub warehouse:  WarehouseSettings,
}

impl IngestConfig {
  /// Load from `path` (missing file is fine) plus `TABULA_*` environment
  /// variables, e.g. `TABULA_WAREHOUSE__DATASET`.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.as_ref()).required(false))
      .add_source(
        config::Environment::with_prefix("TABULA")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()?;
    settings.try_deserialize()
  }
}
