//! Courses domain module.
//!
//! Courses are authored by a single user; sections and content blocks are
//! declared at the HTTP surface only and have no model here.

pub mod course;

pub use course::{Course, NewCourse};
