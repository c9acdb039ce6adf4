//! [`Warehouse`] — the staging-then-merge store over any
//! [`WarehouseClient`].

use std::sync::{
  Arc,
  atomic::{AtomicU64, Ordering},
};

use serde::Serialize;
use tabula_core::ErrorClass;

use crate::{
  Error, Result,
  client::WarehouseClient,
  merge::{KeyColumn, MergeStatement},
  schema::{self, TableSchema},
};

/// Append-and-merge store for a remote analytical database.
///
/// Holds no per-table state; every [`insert_batch`](Warehouse::insert_batch)
/// call is self-contained.
#[derive(Clone)]
pub struct Warehouse<C> {
  client:      C,
  dataset:     String,
  /// Breaks staging-name ties between batches landed within the same
  /// second. Shared across clones, so every handle to one store draws from
  /// the same sequence.
  staging_seq: Arc<AtomicU64>,
}

impl<C: WarehouseClient> Warehouse<C> {
  pub fn new(client: C, dataset: impl Into<String>) -> Self {
    Self {
      client,
      dataset: dataset.into(),
      staging_seq: Arc::new(AtomicU64::new(0)),
    }
  }

  pub fn dataset(&self) -> &str {
    &self.dataset
  }

  pub fn client(&self) -> &C {
    &self.client
  }

  /// Staging tables are named after their destination plus a monotonic
  /// suffix, so rapid successive (or concurrent) runs never collide.
  fn staging_name(&self, table: &str) -> String {
    format!(
      "{table}_{}_{}",
      chrono::Utc::now().timestamp(),
      self.staging_seq.fetch_add(1, Ordering::Relaxed),
    )
  }

  /// Create `table`, treating an already-existing table as success.
  async fn ensure_table(
    &self,
    table: &str,
    schema: &TableSchema,
  ) -> Result<(), C::Error> {
    match self.client.create_table(table, schema).await {
      Ok(())                                                      => Ok(()),
      Err(e) if C::classify(&e) == ErrorClass::AlreadyExists => Ok(()),
      Err(e)                                                      => Err(e),
    }
  }

  /// Land one batch in `table` without accumulating duplicates.
  ///
  /// Steps, strictly in order: ensure the destination exists (schema
  /// inferred from the batch), create a fresh staging table, bulk-load the
  /// batch into it, then merge — staging rows whose natural key matches a
  /// destination row under `key` are dropped, the rest are inserted. Each
  /// step's failure is fatal to the call and names its phase; a staging
  /// table without a completed merge may remain for the operator to
  /// inspect.
  ///
  /// Staging tables are deliberately retained after a successful merge so
  /// each run's newly-arrived rows can be audited. This is an operational
  /// choice, not a leak.
  ///
  /// An empty batch succeeds without touching the warehouse.
  pub async fn insert_batch<T: Serialize>(
    &self,
    table: &str,
    key: &[KeyColumn],
    rows: &[T],
  ) -> Result<()> {
    if rows.is_empty() {
      tracing::debug!(table, "empty batch, nothing to land");
      return Ok(());
    }

    let payload = rows
      .iter()
      .map(serde_json::to_value)
      .collect::<Result<Vec<_>, _>>()
      .map_err(|e| Error::Serialize { table: table.to_owned(), source: e })?;

    let schema = schema::infer(&payload).map_err(|e| Error::SchemaInference {
      table:  table.to_owned(),
      reason: e.to_string(),
    })?;

    self
      .ensure_table(table, &schema)
      .await
      .map_err(|e| Error::CreateTable {
        table:  table.to_owned(),
        source: Box::new(e),
      })?;

    let staging = self.staging_name(table);
    self
      .ensure_table(&staging, &schema)
      .await
      .map_err(|e| Error::CreateStaging {
        table:  staging.clone(),
        source: Box::new(e),
      })?;

    let count = payload.len();
    self
      .client
      .load_rows(&staging, payload)
      .await
      .map_err(|e| Error::Load {
        table: staging.clone(),
        count,
        source: Box::new(e),
      })?;

    let statement = MergeStatement {
      dataset:     self.dataset.clone(),
      destination: table.to_owned(),
      staging:     staging.clone(),
      key:         key.to_vec(),
    };
    self
      .client
      .run_merge(&statement)
      .await
      .map_err(|e| Error::Merge {
        table:  table.to_owned(),
        source: Box::new(e),
      })?;

    tracing::info!(table, staging = %staging, rows = count, "batch merged");
    Ok(())
  }
}
