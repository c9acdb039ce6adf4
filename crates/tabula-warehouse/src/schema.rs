//! Destination-table schemas, inferred from a batch's serialized rows.
//!
//! The warehouse creates tables on demand; their column set is derived
//! automatically from the record type's field set rather than declared by
//! hand. Inference walks the JSON form of every row in the batch, so a
//! field that is null in one row and concrete in another still gets a
//! concrete (nullable) column.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Column types the destination engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
  Bool,
  Int64,
  Float64,
  String,
}

impl std::fmt::Display for ColumnType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      ColumnType::Bool    => "BOOL",
      ColumnType::Int64   => "INT64",
      ColumnType::Float64 => "FLOAT64",
      ColumnType::String  => "STRING",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
  pub name:     String,
  #[serde(rename = "type")]
  pub ty:       ColumnType,
  pub nullable: bool,
}

/// Ordered column set for one destination (or staging) table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
  pub columns: Vec<Column>,
}

/// The record type's shape cannot be mapped to a destination schema.
/// Fatal and never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
  #[error("batch is empty, nothing to infer a schema from")]
  EmptyBatch,

  #[error("row {index} is not a flat object")]
  NotAnObject { index: usize },

  #[error("column {column} holds a nested array or object")]
  Nested { column: String },

  #[error("column {column} mixes {first} and {second} values")]
  Conflict {
    column: String,
    first:  ColumnType,
    second: ColumnType,
  },
}

#[derive(Default)]
struct ColumnState {
  ty:       Option<ColumnType>,
  /// Seen as null (or absent) in at least one row.
  nullable: bool,
  seen:     usize,
}

/// Infer a table schema from every row of a batch.
///
/// Numeric columns widen to [`ColumnType::Float64`] if any row carries a
/// fractional value. A column that is null in every row falls back to a
/// nullable [`ColumnType::String`] — an all-TBA batch is still a valid
/// batch. Columns are emitted in lexicographic order, which is also the
/// order `serde_json` serialises maps in.
pub fn infer(rows: &[Value]) -> Result<TableSchema, SchemaError> {
  if rows.is_empty() {
    return Err(SchemaError::EmptyBatch);
  }

  let mut states: std::collections::BTreeMap<String, ColumnState> =
    std::collections::BTreeMap::new();

  for (index, row) in rows.iter().enumerate() {
    let object = row
      .as_object()
      .ok_or(SchemaError::NotAnObject { index })?;

    for (name, value) in object {
      let state = states.entry(name.clone()).or_default();
      state.seen += 1;

      let observed = match value {
        Value::Null      => {
          state.nullable = true;
          continue;
        }
        Value::Bool(_)   => ColumnType::Bool,
        Value::Number(n) => {
          if n.is_i64() || n.is_u64() {
            ColumnType::Int64
          } else {
            ColumnType::Float64
          }
        }
        Value::String(_) => ColumnType::String,
        Value::Array(_) | Value::Object(_) => {
          return Err(SchemaError::Nested { column: name.clone() });
        }
      };

      state.ty = Some(match (state.ty, observed) {
        (None, t) => t,
        (Some(prev), t) if prev == t => prev,
        // Integral and fractional observations widen to FLOAT64.
        (Some(ColumnType::Int64), ColumnType::Float64)
        | (Some(ColumnType::Float64), ColumnType::Int64) => ColumnType::Float64,
        (Some(prev), t) => {
          return Err(SchemaError::Conflict {
            column: name.clone(),
            first:  prev,
            second: t,
          });
        }
      });
    }
  }

  let total = rows.len();
  let columns = states
    .into_iter()
    .map(|(name, state)| Column {
      name,
      ty:       state.ty.unwrap_or(ColumnType::String),
      nullable: state.nullable || state.seen < total,
    })
    .collect();

  Ok(TableSchema { columns })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn infers_flat_record() {
    let rows = vec![json!({
      "course": "COT3100",
      "crn": 12345,
      "term": "Spring 2019",
      "instructor": "Asai",
      "rating": 4.2,
      "online": false,
    })];

    let schema = infer(&rows).unwrap();
    let by_name: Vec<(&str, ColumnType, bool)> = schema
      .columns
      .iter()
      .map(|c| (c.name.as_str(), c.ty, c.nullable))
      .collect();

    assert_eq!(by_name, vec![
      ("course", ColumnType::String, false),
      ("crn", ColumnType::Int64, false),
      ("instructor", ColumnType::String, false),
      ("online", ColumnType::Bool, false),
      ("rating", ColumnType::Float64, false),
      ("term", ColumnType::String, false),
    ]);
  }

  #[test]
  fn null_in_one_row_makes_column_nullable() {
    let rows = vec![
      json!({ "course": "A", "instructor": null }),
      json!({ "course": "B", "instructor": "Asai" }),
    ];

    let schema = infer(&rows).unwrap();
    let instructor = &schema.columns[1];
    assert_eq!(instructor.name, "instructor");
    assert_eq!(instructor.ty, ColumnType::String);
    assert!(instructor.nullable);
    assert!(!schema.columns[0].nullable);
  }

  #[test]
  fn all_null_column_falls_back_to_nullable_string() {
    let rows = vec![
      json!({ "course": "A", "instructor": null }),
      json!({ "course": "B", "instructor": null }),
    ];

    let schema = infer(&rows).unwrap();
    let instructor = &schema.columns[1];
    assert_eq!(instructor.ty, ColumnType::String);
    assert!(instructor.nullable);
  }

  #[test]
  fn int_and_float_widen_to_float() {
    let rows = vec![
      json!({ "rating": 4 }),
      json!({ "rating": 4.5 }),
    ];
    let schema = infer(&rows).unwrap();
    assert_eq!(schema.columns[0].ty, ColumnType::Float64);
  }

  #[test]
  fn empty_batch_is_an_error() {
    assert_eq!(infer(&[]).unwrap_err(), SchemaError::EmptyBatch);
  }

  #[test]
  fn non_object_row_is_an_error() {
    let err = infer(&[json!(["not", "an", "object"])]).unwrap_err();
    assert_eq!(err, SchemaError::NotAnObject { index: 0 });
  }

  #[test]
  fn nested_value_is_an_error() {
    let err = infer(&[json!({ "course": { "name": "COT3100" } })]).unwrap_err();
    assert_eq!(err, SchemaError::Nested { column: "course".into() });
  }

  #[test]
  fn conflicting_types_are_an_error() {
    let rows = vec![
      json!({ "crn": 12345 }),
      json!({ "crn": "12345" }),
    ];
    assert!(matches!(
      infer(&rows).unwrap_err(),
      SchemaError::Conflict { column, .. } if column == "crn"
    ));
  }
}
