//! `triagem` - Local symptom intake with a preliminary assessment and history
//!
//! This library collects self-reported symptoms into an assessment record,
//! keeps it in a local key-value store, renders a fixed preliminary
//! assessment, and maintains a newest-first consultation history.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod assessment;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod report;
pub mod routes;
pub mod storage;

pub use app::{Clinic, CommitOutcome, Finish, Page, ResultsExit, Status};
pub use assessment::{AssessmentRecord, DurationBucket, Field, MedicalCondition, Sex};
pub use config::Config;
pub use error::{Error, Result};
pub use history::HistoryEntry;
pub use logging::init_logging;
pub use report::{ResultsView, Urgency};
pub use routes::Route;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
