//! Set-based merge statements — the deduplication primitive the destination
//! engine actually has.
//!
//! The warehouse cannot reject a duplicate row at insert time, so each batch
//! is compared against the destination as a whole: staging rows whose
//! natural key already matches a destination row are dropped, the rest are
//! inserted as-is. The engine evaluates this as one atomic statement.

use serde_json::{Map, Value};

/// One column of a merge's natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumn {
  name:            String,
  null_coalescing: bool,
}

impl KeyColumn {
  /// Match on strict equality; a NULL on either side never matches.
  pub fn exact(name: impl Into<String>) -> Self {
    Self { name: name.into(), null_coalescing: false }
  }

  /// Match on equality, or whenever at least one side is NULL.
  ///
  /// This is what keeps a section scraped before its instructor was
  /// assigned from landing twice. Known limitation: if an unset value is
  /// later assigned a *different* concrete value, the two rows still merge
  /// silently — there is no way to disambiguate that case from the data.
  pub fn null_coalescing(name: impl Into<String>) -> Self {
    Self { name: name.into(), null_coalescing: true }
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

/// A `MERGE ... WHEN NOT MATCHED THEN INSERT ROW` statement comparing one
/// staging table against its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStatement {
  pub dataset:     String,
  pub destination: String,
  pub staging:     String,
  pub key:         Vec<KeyColumn>,
}

impl MergeStatement {
  /// Render the statement for the destination engine.
  pub fn to_sql(&self) -> String {
    let on = self
      .key
      .iter()
      .map(|k| {
        let c = &k.name;
        if k.null_coalescing {
          format!("(t.{c} = s.{c} OR (t.{c} IS NULL OR s.{c} IS NULL))")
        } else {
          format!("t.{c} = s.{c}")
        }
      })
      .collect::<Vec<_>>()
      .join("\n  AND ");

    format!(
      "MERGE {ds}.{dest} t\nUSING {ds}.{stg} s\nON {on}\nWHEN NOT MATCHED THEN\n  INSERT ROW",
      ds = self.dataset,
      dest = self.destination,
      stg = self.staging,
    )
  }

  /// Client-side mirror of the SQL `ON` predicate, over JSON rows.
  ///
  /// The HTTP client never calls this — the engine evaluates the rendered
  /// SQL. Embedded and test clients use it to execute the same matched /
  /// not-matched semantics over in-memory tables.
  pub fn key_matches(
    &self,
    t: &Map<String, Value>,
    s: &Map<String, Value>,
  ) -> bool {
    self.key.iter().all(|k| {
      let tv = t.get(&k.name).unwrap_or(&Value::Null);
      let sv = s.get(&k.name).unwrap_or(&Value::Null);
      if k.null_coalescing {
        tv.is_null() || sv.is_null() || tv == sv
      } else {
        // SQL equality: NULL on either side is not a match.
        !tv.is_null() && !sv.is_null() && tv == sv
      }
    })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn course_key() -> Vec<KeyColumn> {
    vec![
      KeyColumn::exact("course"),
      KeyColumn::exact("term"),
      KeyColumn::exact("crn"),
      KeyColumn::null_coalescing("instructor"),
    ]
  }

  fn statement() -> MergeStatement {
    MergeStatement {
      dataset:     "tabula".into(),
      destination: "isqs".into(),
      staging:     "isqs_1554076800_0".into(),
      key:         course_key(),
    }
  }

  #[test]
  fn renders_course_merge_exactly() {
    assert_eq!(
      statement().to_sql(),
      "MERGE tabula.isqs t\n\
       USING tabula.isqs_1554076800_0 s\n\
       ON t.course = s.course\n\
       \x20 AND t.term = s.term\n\
       \x20 AND t.crn = s.crn\n\
       \x20 AND (t.instructor = s.instructor OR (t.instructor IS NULL OR s.instructor IS NULL))\n\
       WHEN NOT MATCHED THEN\n\
       \x20 INSERT ROW"
    );
  }

  fn row(instructor: Option<&str>) -> Map<String, Value> {
    json!({
      "course": "CS101",
      "term": "Spring2019",
      "crn": 1234,
      "instructor": instructor,
    })
    .as_object()
    .unwrap()
    .clone()
  }

  #[test]
  fn equal_keys_match() {
    let stmt = statement();
    assert!(stmt.key_matches(&row(Some("Dr. Smith")), &row(Some("Dr. Smith"))));
  }

  #[test]
  fn unset_instructor_matches_any_concrete_instructor() {
    let stmt = statement();
    assert!(stmt.key_matches(&row(None), &row(Some("Dr. Smith"))));
    assert!(stmt.key_matches(&row(Some("Dr. Smith")), &row(None)));
    assert!(stmt.key_matches(&row(None), &row(None)));
  }

  #[test]
  fn distinct_instructors_do_not_match() {
    let stmt = statement();
    assert!(!stmt.key_matches(&row(Some("Dr. Smith")), &row(Some("Dr. Jones"))));
  }

  #[test]
  fn exact_columns_never_match_on_null() {
    let stmt = statement();
    let mut missing_term = row(Some("Dr. Smith"));
    missing_term.insert("term".into(), Value::Null);
    assert!(!stmt.key_matches(&missing_term, &row(Some("Dr. Smith"))));
  }

  #[test]
  fn different_crn_does_not_match() {
    let stmt = statement();
    let mut other = row(None);
    other.insert("crn".into(), json!(9999));
    assert!(!stmt.key_matches(&other, &row(Some("Dr. Smith"))));
  }
}
