//! SQL schema for the tabula SQLite store.
//!
//! Executed at every connection startup; idempotent thanks to
//! `IF NOT EXISTS`, so repeated initialisation neither errors nor resets
//! existing data.

/// Full schema DDL.
///
/// The `courses_natural_key` index is what makes re-ingestion idempotent:
/// a second insert of the same `(crn, term, instructor, name)` fails with
/// `SQLITE_CONSTRAINT_UNIQUE`, which the store classifies as a benign
/// duplicate. `IFNULL(instructor, '')` is load-bearing — SQLite treats bare
/// NULLs as distinct in unique indexes, and TBA sections must still collide
/// with themselves on the next run.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS courses (
    course_id  TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    crn        INTEGER NOT NULL,
    term       TEXT NOT NULL,
    instructor TEXT             -- NULL for unassigned/TBA sections
);

CREATE UNIQUE INDEX IF NOT EXISTS courses_natural_key
    ON courses (crn, term, IFNULL(instructor, ''), name);

-- Feature tables are insert-only. No UPDATE or DELETE is ever issued.
CREATE TABLE IF NOT EXISTS isq (
    isq_id        TEXT PRIMARY KEY,
    course_id     TEXT NOT NULL REFERENCES courses(course_id),
    enrolled      INTEGER NOT NULL,
    responded     INTEGER NOT NULL,
    response_rate REAL NOT NULL,
    percent_5     REAL NOT NULL,
    percent_4     REAL NOT NULL,
    percent_3     REAL NOT NULL,
    percent_2     REAL NOT NULL,
    percent_1     REAL NOT NULL,
    rating        REAL NOT NULL CHECK (rating BETWEEN 0.0 AND 5.0)
);

CREATE TABLE IF NOT EXISTS grades (
    grades_id   TEXT PRIMARY KEY,
    course_id   TEXT NOT NULL REFERENCES courses(course_id),
    percent_a   REAL NOT NULL,
    percent_b   REAL NOT NULL,
    percent_c   REAL NOT NULL,
    percent_d   REAL NOT NULL,
    percent_f   REAL NOT NULL,
    percent_w   REAL NOT NULL,
    average_gpa REAL             -- not reported for some sections
);

CREATE TABLE IF NOT EXISTS sections (
    section_id TEXT PRIMARY KEY,
    course_id  TEXT NOT NULL REFERENCES courses(course_id),
    days       TEXT,
    start_time TEXT,
    duration   TEXT,
    building   TEXT,
    room       TEXT,
    credits    INTEGER
);

CREATE INDEX IF NOT EXISTS isq_course_idx      ON isq(course_id);
CREATE INDEX IF NOT EXISTS grades_course_idx   ON grades(course_id);
CREATE INDEX IF NOT EXISTS sections_course_idx ON sections(course_id);

PRAGMA user_version = 1;
";
