//! The `CourseStore` trait — the seam between the orchestrator and the
//! local transactional backend.
//!
//! Implemented by storage backends (e.g. `tabula-store-sqlite`). The
//! orchestrator (`tabula-ingest`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::course::Aggregate;

/// A durable, transactional course store with duplicate suppression.
///
/// `save` is all-or-nothing: either the full aggregate (course plus every
/// feature) becomes visible, or none of it does. Re-submitting an identical
/// aggregate is a success-no-op — the store never grows duplicate rows.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait CourseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist one aggregate atomically.
  ///
  /// A natural-key collision on the course is benign and reported as
  /// success; any other failure rolls the transaction back and propagates.
  fn save(
    &self,
    aggregate: Aggregate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
