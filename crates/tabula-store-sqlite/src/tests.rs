//! Integration tests for `SqliteStore` against an in-memory database.

use tabula_core::{
  course::{Aggregate, Course},
  feature::{Feature, Grades, Isq, Schedule},
  store::CourseStore,
};

use crate::{FeatureCounts, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn course(instructor: Option<&str>) -> Course {
  Course {
    name:       "COT3100".into(),
    crn:        12345,
    term:       "Spring 2019".into(),
    instructor: instructor.map(str::to_owned),
  }
}

fn isq(rating: f64) -> Feature {
  Feature::Isq(Isq {
    enrolled:      35,
    responded:     20,
    response_rate: 57.1,
    percent_5:     40.0,
    percent_4:     30.0,
    percent_3:     15.0,
    percent_2:     10.0,
    percent_1:     5.0,
    rating,
  })
}

fn grades() -> Feature {
  Feature::Grades(Grades {
    percent_a:   30.0,
    percent_b:   25.0,
    percent_c:   20.0,
    percent_d:   10.0,
    percent_f:   5.0,
    percent_w:   10.0,
    average_gpa: Some(2.9),
  })
}

fn schedule() -> Feature {
  Feature::Schedule(Schedule {
    days:       Some("MWF".into()),
    start_time: Some("10:00".into()),
    duration:   Some("50".into()),
    building:   Some("15".into()),
    room:       Some("1404".into()),
    credits:    Some(3),
  })
}

fn aggregate(instructor: Option<&str>) -> Aggregate {
  Aggregate::with_features(
    course(instructor),
    vec![isq(4.2), grades(), schedule()],
  )
}

// ─── Saving ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_lookup() {
  let s = store().await;

  s.save(aggregate(Some("Asai"))).await.unwrap();

  let key = s
    .lookup_course(&course(Some("Asai")))
    .await
    .unwrap()
    .expect("course row");

  let counts = s.feature_counts(key).await.unwrap();
  assert_eq!(counts, FeatureCounts { isq: 1, grades: 1, sections: 1 });
}

#[tokio::test]
async fn save_aggregate_without_features() {
  let s = store().await;
  s.save(Aggregate::new(course(Some("Asai")))).await.unwrap();

  let key = s
    .lookup_course(&course(Some("Asai")))
    .await
    .unwrap()
    .expect("course row");
  assert_eq!(s.feature_counts(key).await.unwrap(), FeatureCounts::default());
}

// ─── Idempotence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn resubmitting_same_aggregate_adds_nothing() {
  let s = store().await;

  s.save(aggregate(Some("Asai"))).await.unwrap();
  s.save(aggregate(Some("Asai"))).await.unwrap();

  assert_eq!(s.course_count().await.unwrap(), 1);
  let key = s
    .lookup_course(&course(Some("Asai")))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(
    s.feature_counts(key).await.unwrap(),
    FeatureCounts { isq: 1, grades: 1, sections: 1 }
  );
}

#[tokio::test]
async fn unset_instructor_still_deduplicates() {
  // SQLite treats NULLs as distinct in plain unique indexes; the schema's
  // IFNULL index must make TBA sections collide with themselves anyway.
  let s = store().await;

  s.save(aggregate(None)).await.unwrap();
  s.save(aggregate(None)).await.unwrap();

  assert_eq!(s.course_count().await.unwrap(), 1);
}

#[tokio::test]
async fn distinct_instructors_are_distinct_rows() {
  let s = store().await;

  s.save(aggregate(Some("Smith"))).await.unwrap();
  s.save(aggregate(Some("Jones"))).await.unwrap();

  assert_eq!(s.course_count().await.unwrap(), 2);
}

#[tokio::test]
async fn distinct_terms_are_distinct_rows() {
  let s = store().await;

  let mut fall = aggregate(Some("Asai"));
  fall.course.term = "Fall 2019".into();

  s.save(aggregate(Some("Asai"))).await.unwrap();
  s.save(fall).await.unwrap();

  assert_eq!(s.course_count().await.unwrap(), 2);
}

// ─── Atomicity ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn failing_feature_rolls_back_whole_aggregate() {
  let s = store().await;

  // Third feature violates the isq rating CHECK constraint.
  let bad = Aggregate::with_features(
    course(Some("Asai")),
    vec![grades(), schedule(), isq(9.9), isq(4.0)],
  );

  s.save(bad).await.unwrap_err();

  // Nothing from the aborted aggregate is visible.
  assert_eq!(s.course_count().await.unwrap(), 0);
  assert!(
    s.lookup_course(&course(Some("Asai")))
      .await
      .unwrap()
      .is_none()
  );

  // A subsequent valid save works and gets its own key.
  s.save(aggregate(Some("Asai"))).await.unwrap();
  let key = s
    .lookup_course(&course(Some("Asai")))
    .await
    .unwrap()
    .expect("course row");
  assert_eq!(
    s.feature_counts(key).await.unwrap(),
    FeatureCounts { isq: 1, grades: 1, sections: 1 }
  );
}

// ─── Schema initialisation ───────────────────────────────────────────────────

#[tokio::test]
async fn reopening_reruns_schema_without_damage() {
  let path = std::env::temp_dir()
    .join(format!("tabula-test-{}.db", uuid::Uuid::new_v4()));

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.save(aggregate(Some("Asai"))).await.unwrap();
  }

  // Reopen twice more; DDL runs each time and must neither error nor reset.
  for _ in 0..2 {
    let s = SqliteStore::open(&path).await.unwrap();
    assert_eq!(s.course_count().await.unwrap(), 1);
    s.save(aggregate(Some("Asai"))).await.unwrap();
    assert_eq!(s.course_count().await.unwrap(), 1);
  }

  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
  }
}
