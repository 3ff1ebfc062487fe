//! Core domain logic for the satchel client.
//!
//! Pure types and rules shared by every consumer: the schema model and
//! its label validation, record value checking, activity feed ordering,
//! spreadsheet-import gates, display formatting, and the built-in
//! folder template catalog. No I/O and no async; everything here is
//! deterministic and unit-testable.

pub mod activity;
pub mod format;
pub mod import;
pub mod model;
pub mod schema;
pub mod templates;
pub mod types;
pub mod value;
