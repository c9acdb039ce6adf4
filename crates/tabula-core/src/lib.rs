//! Core types and trait definitions for the tabula course-record store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Both storage backends and the ingest orchestrator depend on it; it
//! depends on nothing proprietary.

pub mod course;
pub mod error;
pub mod feature;
pub mod rows;
pub mod store;

pub use course::{Aggregate, Course, CourseKey};
pub use error::ErrorClass;
pub use feature::{Feature, FeatureWriter, Grades, Isq, Schedule};
