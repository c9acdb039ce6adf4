//! [`Ingestor`] — fans one scraping run out to both stores.

use tabula_core::{rows::DeptCourse, store::CourseStore};
use tabula_store_sqlite::SqliteStore;
use tabula_warehouse::{
  HttpClient, KeyColumn, Warehouse, WarehouseClient, WarehouseConfig,
};

use crate::{
  Error, Result,
  collect::{Collector, build_aggregates, dedup_course_names},
  config::IngestConfig,
};

/// The course natural key as the warehouse merge sees it: exact match on
/// course, term and crn; null-coalescing match on instructor.
pub fn course_natural_key() -> Vec<KeyColumn> {
  vec![
    KeyColumn::exact("course"),
    KeyColumn::exact("term"),
    KeyColumn::exact("crn"),
    KeyColumn::null_coalescing("instructor"),
  ]
}

/// Orchestrates one run: local aggregates plus four warehouse batches.
///
/// Every store call is awaited to completion before the next begins. The
/// first fatal error aborts the run and propagates; whether to rerun is the
/// caller's decision — nothing here retries.
pub struct Ingestor<L, C> {
  local:     L,
  warehouse: Warehouse<C>,
}

impl Ingestor<SqliteStore, HttpClient> {
  /// Wire up the concrete production stores from configuration.
  pub async fn from_config(config: &IngestConfig) -> Result<Self> {
    let local = SqliteStore::open(&config.store_path).await?;
    let client = HttpClient::new(WarehouseConfig {
      base_url: config.warehouse.base_url.clone(),
      dataset:  config.warehouse.dataset.clone(),
      token:    config.warehouse.token.clone(),
    })?;
    let warehouse = Warehouse::new(client, config.warehouse.dataset.clone());
    Ok(Self::new(local, warehouse))
  }
}

impl<L, C> Ingestor<L, C>
where
  L: CourseStore,
  C: WarehouseClient,
{
  pub fn new(local: L, warehouse: Warehouse<C>) -> Self {
    Self { local, warehouse }
  }

  pub fn warehouse(&self) -> &Warehouse<C> {
    &self.warehouse
  }

  /// Ingest one department listing: collect each distinct course's records
  /// once, save the aggregates locally, then land the flattened tables in
  /// the warehouse.
  pub async fn run<K: Collector>(
    &self,
    department: Vec<DeptCourse>,
    collector: &K,
  ) -> Result<()> {
    let names = dedup_course_names(&department);
    tracing::info!(
      listing_rows = department.len(),
      courses = names.len(),
      "ingesting department listing"
    );

    let mut isqs = Vec::new();
    let mut grades = Vec::new();
    let mut sections = Vec::new();

    for name in &names {
      let records =
        collector
          .course_records(name)
          .await
          .map_err(|e| Error::Collect {
            course: name.clone(),
            source: Box::new(e),
          })?;

      for aggregate in build_aggregates(&records) {
        let course = aggregate.course.name.clone();
        self
          .local
          .save(aggregate)
          .await
          .map_err(|e| Error::Save { course, source: Box::new(e) })?;
      }

      isqs.extend(records.isqs);
      grades.extend(records.grades);
      sections.extend(records.schedules);
    }

    let key = course_natural_key();
    self
      .warehouse
      .insert_batch("departments", &key, &department)
      .await?;
    self.warehouse.insert_batch("isqs", &key, &isqs).await?;
    self.warehouse.insert_batch("grades", &key, &grades).await?;
    self.warehouse.insert_batch("sections", &key, &sections).await?;

    Ok(())
  }
}
