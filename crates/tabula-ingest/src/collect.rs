//! The collector boundary and record regrouping.
//!
//! Scraping itself is an external collaborator; this module only defines
//! the seam it is called through and the reshaping of its flat row output
//! into per-course aggregates.

use std::{
  collections::{HashMap, HashSet},
  future::Future,
};

use tabula_core::{
  course::{Aggregate, Course},
  feature::Feature,
  rows::{CourseGrades, CourseIsq, CourseSection, DeptCourse},
};

/// Everything the collector scraped for one course name — already parsed
/// and validated; this layer never sees raw text.
#[derive(Debug, Clone, Default)]
pub struct CourseRecords {
  pub isqs:      Vec<CourseIsq>,
  pub grades:    Vec<CourseGrades>,
  pub schedules: Vec<CourseSection>,
}

/// External scraping collaborator, specified only at this seam.
pub trait Collector: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch all dependent records for one course name.
  fn course_records(
    &self,
    course: &str,
  ) -> impl Future<Output = Result<CourseRecords, Self::Error>> + Send;
}

/// Order-preserving, first-seen dedup of a department listing by course
/// name. Two scraped rows with the same course name are one logical course
/// for the purpose of fetching its dependent records.
pub fn dedup_course_names(rows: &[DeptCourse]) -> Vec<String> {
  let mut seen = HashSet::new();
  let mut names = Vec::new();
  for row in rows {
    if seen.insert(row.course.name.clone()) {
      names.push(row.course.name.clone());
    }
  }
  names
}

/// Regroup one course's flat records into aggregates, one per distinct
/// offering (natural key), preserving first-seen order.
pub fn build_aggregates(records: &CourseRecords) -> Vec<Aggregate> {
  let mut aggregates: Vec<Aggregate> = Vec::new();
  let mut index: HashMap<Course, usize> = HashMap::new();

  fn slot<'a>(
    aggregates: &'a mut Vec<Aggregate>,
    index: &mut HashMap<Course, usize>,
    course: &Course,
  ) -> &'a mut Aggregate {
    let i = *index.entry(course.clone()).or_insert_with(|| {
      aggregates.push(Aggregate::new(course.clone()));
      aggregates.len() - 1
    });
    &mut aggregates[i]
  }

  for row in &records.isqs {
    slot(&mut aggregates, &mut index, &row.course)
      .features
      .push(Feature::Isq(row.isq.clone()));
  }
  for row in &records.grades {
    slot(&mut aggregates, &mut index, &row.course)
      .features
      .push(Feature::Grades(row.grades.clone()));
  }
  for row in &records.schedules {
    slot(&mut aggregates, &mut index, &row.course)
      .features
      .push(Feature::Schedule(row.schedule.clone()));
  }

  aggregates
}
