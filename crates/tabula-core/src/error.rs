//! Backend-agnostic error classification.

/// How a storage backend sorts its engine-specific errors.
///
/// Each backend supplies a classifier into this enum so orchestration logic
/// never inspects a specific engine's error representation. Only `Fatal`
/// aborts the enclosing operation; the two benign classes are swallowed at
/// the point they are meaningful (duplicate row on insert, existing object
/// on create).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
  /// A natural-key collision detected by a uniqueness constraint.
  /// Benign on insert: the row is already there.
  Duplicate,
  /// A table/dataset/schema object is already present.
  /// Benign at creation time.
  AlreadyExists,
  /// Everything else. Never retried; always surfaced to the caller.
  Fatal,
}
