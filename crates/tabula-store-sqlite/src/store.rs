//! [`SqliteStore`] — the SQLite implementation of [`CourseStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use tabula_core::{
  ErrorClass,
  course::{Aggregate, Course, CourseKey},
  feature::{FeatureWriter, Grades, Isq, Schedule},
  store::CourseStore,
};

use crate::{Error, Result, error::classify, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tabula course store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All writes
/// route through the one-transaction-per-aggregate pattern in
/// [`CourseStore::save`].
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Per-table feature row counts for one course — see
/// [`SqliteStore::feature_counts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureCounts {
  pub isq:      usize,
  pub grades:   usize,
  pub sections: usize,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Idempotent: safe to run against an already-initialised database.
  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Read-back helpers ──────────────────────────────────────────────────────
  //
  // Just enough visibility for offline/incremental callers; this store is
  // not a query layer.

  /// Look up the surrogate key for a course by its exact natural key
  /// (an unset instructor only matches an unset instructor here).
  pub async fn lookup_course(
    &self,
    course: &Course,
  ) -> Result<Option<CourseKey>> {
    let name       = course.name.clone();
    let crn        = course.crn;
    let term       = course.term.clone();
    let instructor = course.instructor.clone();

    let id_str: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT course_id FROM courses
               WHERE crn = ?1 AND term = ?2 AND name = ?3 AND instructor IS ?4",
              rusqlite::params![crn, term, name, instructor],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    id_str
      .map(|s| Uuid::parse_str(&s).map(CourseKey).map_err(Error::Uuid))
      .transpose()
  }

  /// Total number of course rows visible in the store.
  pub async fn course_count(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))?)
      })
      .await?;
    Ok(count as usize)
  }

  /// Number of feature rows of each kind attached to `key`.
  pub async fn feature_counts(&self, key: CourseKey) -> Result<FeatureCounts> {
    let id_str = key.to_string();

    let (isq, grades, sections): (i64, i64, i64) = self
      .conn
      .call(move |conn| {
        let count = |sql: &str| -> rusqlite::Result<i64> {
          conn.query_row(sql, rusqlite::params![id_str], |row| row.get(0))
        };
        let isq =
          count("SELECT COUNT(*) FROM isq WHERE course_id = ?1")?;
        let grades =
          count("SELECT COUNT(*) FROM grades WHERE course_id = ?1")?;
        let sections =
          count("SELECT COUNT(*) FROM sections WHERE course_id = ?1")?;
        Ok((isq, grades, sections))
      })
      .await?;

    Ok(FeatureCounts {
      isq:      isq as usize,
      grades:   grades as usize,
      sections: sections as usize,
    })
  }
}

// ─── Transactional inserts ───────────────────────────────────────────────────

/// Insert the course row, minting `key` as its surrogate identifier.
///
/// Returns `false` (without error) when the natural key already exists —
/// the aggregate was persisted by an earlier run and rows are immutable, so
/// there is nothing left to do.
fn insert_course(
  tx: &rusqlite::Transaction<'_>,
  key: CourseKey,
  course: &Course,
) -> rusqlite::Result<bool> {
  let result = tx.execute(
    "INSERT INTO courses (course_id, name, crn, term, instructor)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![
      key.to_string(),
      course.name,
      course.crn,
      course.term,
      course.instructor,
    ],
  );

  match result {
    Ok(_) => Ok(true),
    Err(e) if classify(&e) == ErrorClass::Duplicate => Ok(false),
    Err(e) => Err(e),
  }
}

/// [`FeatureWriter`] over an open transaction. Each row gets its own
/// surrogate UUID and is tagged with the owning course's key.
struct TxFeatureWriter<'a, 'tx> {
  tx: &'a rusqlite::Transaction<'tx>,
}

impl FeatureWriter for TxFeatureWriter<'_, '_> {
  type Error = rusqlite::Error;

  fn write_isq(&mut self, key: CourseKey, isq: &Isq) -> rusqlite::Result<()> {
    self.tx.execute(
      "INSERT INTO isq (
         isq_id, course_id, enrolled, responded, response_rate,
         percent_5, percent_4, percent_3, percent_2, percent_1, rating
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
      rusqlite::params![
        Uuid::new_v4().to_string(),
        key.to_string(),
        isq.enrolled,
        isq.responded,
        isq.response_rate,
        isq.percent_5,
        isq.percent_4,
        isq.percent_3,
        isq.percent_2,
        isq.percent_1,
        isq.rating,
      ],
    )?;
    Ok(())
  }

  fn write_grades(
    &mut self,
    key: CourseKey,
    grades: &Grades,
  ) -> rusqlite::Result<()> {
    self.tx.execute(
      "INSERT INTO grades (
         grades_id, course_id, percent_a, percent_b, percent_c,
         percent_d, percent_f, percent_w, average_gpa
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
      rusqlite::params![
        Uuid::new_v4().to_string(),
        key.to_string(),
        grades.percent_a,
        grades.percent_b,
        grades.percent_c,
        grades.percent_d,
        grades.percent_f,
        grades.percent_w,
        grades.average_gpa,
      ],
    )?;
    Ok(())
  }

  fn write_schedule(
    &mut self,
    key: CourseKey,
    schedule: &Schedule,
  ) -> rusqlite::Result<()> {
    self.tx.execute(
      "INSERT INTO sections (
         section_id, course_id, days, start_time, duration,
         building, room, credits
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
      rusqlite::params![
        Uuid::new_v4().to_string(),
        key.to_string(),
        schedule.days,
        schedule.start_time,
        schedule.duration,
        schedule.building,
        schedule.room,
        schedule.credits,
      ],
    )?;
    Ok(())
  }
}

// ─── CourseStore impl ────────────────────────────────────────────────────────

impl CourseStore for SqliteStore {
  type Error = Error;

  async fn save(&self, aggregate: Aggregate) -> Result<()> {
    let course_name = aggregate.course.name.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let key = CourseKey::generate();
        let inserted = insert_course(&tx, key, &aggregate.course)?;
        if inserted {
          let mut writer = TxFeatureWriter { tx: &tx };
          for feature in &aggregate.features {
            feature.persist(&mut writer, key)?;
          }
        }

        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    if inserted {
      tracing::debug!(course = %course_name, "aggregate saved");
    } else {
      tracing::debug!(course = %course_name, "duplicate course, skipped");
    }
    Ok(())
  }
}
