//! Feature types — records dependent on exactly one [`Course`].
//!
//! A feature never decides where it is stored. It dispatches itself through
//! a [`FeatureWriter`] supplied by the caller, which lets every storage
//! backend reuse the same value types.
//!
//! [`Course`]: crate::course::Course

use serde::{Deserialize, Serialize};

use crate::course::CourseKey;

/// Instructor-survey (ISQ) results for one section.
///
/// `percent_5` through `percent_1` are the response-rating buckets;
/// `rating` is the weighted mean and is always within `0.0..=5.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Isq {
  pub enrolled:      u32,
  pub responded:     u32,
  pub response_rate: f64,
  pub percent_5:     f64,
  pub percent_4:     f64,
  pub percent_3:     f64,
  pub percent_2:     f64,
  pub percent_1:     f64,
  pub rating:        f64,
}

/// Grade distribution for one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grades {
  pub percent_a:   f64,
  pub percent_b:   f64,
  pub percent_c:   f64,
  pub percent_d:   f64,
  pub percent_f:   f64,
  /// Withdrawals.
  pub percent_w:   f64,
  /// Not reported for some sections.
  pub average_gpa: Option<f64>,
}

/// Meeting data for one section. Everything is optional — online and
/// directed-study sections publish none of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
  /// Meeting-day pattern, e.g. "MWF".
  pub days:       Option<String>,
  pub start_time: Option<String>,
  pub duration:   Option<String>,
  pub building:   Option<String>,
  pub room:       Option<String>,
  pub credits:    Option<u8>,
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Capability interface a storage backend supplies to receive feature rows.
///
/// Implementations attach each row to its owning course via the surrogate
/// key and submit it through whatever inserter they wrap (a transaction, a
/// buffered batch, ...).
pub trait FeatureWriter {
  type Error;

  fn write_isq(&mut self, key: CourseKey, isq: &Isq) -> Result<(), Self::Error>;

  fn write_grades(
    &mut self,
    key: CourseKey,
    grades: &Grades,
  ) -> Result<(), Self::Error>;

  fn write_schedule(
    &mut self,
    key: CourseKey,
    schedule: &Schedule,
  ) -> Result<(), Self::Error>;
}

/// A record dependent on exactly one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Feature {
  Isq(Isq),
  Grades(Grades),
  Schedule(Schedule),
}

impl Feature {
  /// Submit this feature, tagged with its owning course's key, through the
  /// caller-supplied writer.
  pub fn persist<W: FeatureWriter>(
    &self,
    writer: &mut W,
    key: CourseKey,
  ) -> Result<(), W::Error> {
    match self {
      Feature::Isq(isq)           => writer.write_isq(key, isq),
      Feature::Grades(grades)     => writer.write_grades(key, grades),
      Feature::Schedule(schedule) => writer.write_schedule(key, schedule),
    }
  }
}
