//! Course — the root entity every scraped record hangs off.
//!
//! A course value is immutable once produced by the collector. It is
//! persisted exactly once per store; re-submissions are deduplicated by the
//! natural key, never updated in place.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feature::Feature;

/// One offering of a course in one term.
///
/// The whole struct is the natural key: `(crn, term, instructor, name)`.
/// `instructor` may be unset — sections are routinely published as "TBA" and
/// only later assigned an instructor. Stores treat an unset instructor as
/// compatible with any concrete value when deduplicating (null-coalescing
/// equality), so the same physical section is not stored twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Course {
  /// Course identifier, e.g. "COT3100". Serialised as `course` — the column
  /// name the warehouse merge predicate joins on.
  #[serde(rename = "course")]
  pub name:       String,
  /// Course reference number; unique within a term, reused across terms.
  pub crn:        u32,
  /// Term label, e.g. "Spring 2019".
  pub term:       String,
  pub instructor: Option<String>,
}

/// Surrogate identifier for a course row in the local store.
///
/// Minted when the course is first inserted; features reference their
/// owning course through it. The warehouse has no surrogate key — features
/// there are joined back to their course purely through the natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseKey(pub Uuid);

impl CourseKey {
  /// Mint a fresh key. Keys from aborted (rolled-back) inserts are never
  /// handed out again.
  pub fn generate() -> Self {
    Self(Uuid::new_v4())
  }
}

impl std::fmt::Display for CourseKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

/// One course plus its dependent feature rows — the unit of persistence for
/// the local store. Either the whole aggregate becomes visible or none of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
  pub course:   Course,
  pub features: Vec<Feature>,
}

impl Aggregate {
  pub fn new(course: Course) -> Self {
    Self { course, features: Vec::new() }
  }

  pub fn with_features(course: Course, features: Vec<Feature>) -> Self {
    Self { course, features }
  }
}
