//! Flattened row shapes for the warehouse destination tables.
//!
//! The warehouse keeps no surrogate keys, so each row carries the full
//! course natural key alongside the feature fields. `#[serde(flatten)]`
//! produces the flat column set the schema-inference layer expects.

use serde::{Deserialize, Serialize};

use crate::{
  course::Course,
  feature::{Grades, Isq, Schedule},
};

/// Row for the `isqs` destination table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseIsq {
  #[serde(flatten)]
  pub course: Course,
  #[serde(flatten)]
  pub isq:    Isq,
}

/// Row for the `grades` destination table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseGrades {
  #[serde(flatten)]
  pub course: Course,
  #[serde(flatten)]
  pub grades: Grades,
}

/// Row for the `sections` destination table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSection {
  #[serde(flatten)]
  pub course:   Course,
  #[serde(flatten)]
  pub schedule: Schedule,
}

/// Row for the `departments` destination table — one line of a department's
/// term listing, as scraped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeptCourse {
  #[serde(flatten)]
  pub course:     Course,
  #[serde(flatten)]
  pub schedule:   Schedule,
  pub department: String,
}
