//! Upsert orchestration for tabula.
//!
//! Translates one scraping run's output into calls against the local
//! transactional store and the warehouse: department listings are
//! deduplicated by course name before any collection work, per-course
//! records are grouped into aggregates for the local store, and the
//! flattened row tables are landed in the warehouse under the course
//! natural key. The orchestrator holds no storage state of its own.

pub mod collect;
pub mod config;
pub mod error;

mod ingest;

pub use collect::{Collector, CourseRecords, build_aggregates, dedup_course_names};
pub use config::{IngestConfig, WarehouseSettings};
pub use error::{Error, Result};
pub use ingest::{Ingestor, course_natural_key};
