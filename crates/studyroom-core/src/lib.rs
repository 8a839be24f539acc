//! # Studyroom Core Library
//!
//! Course tracking and grade management for students. The CLI binary is a
//! thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Grading**: pure calculators over a snapshot (course grade, weights,
//!   grade boundary tables, GPA aggregation)
//! - **Entities**: courses, evaluations, sessions and settings with
//!   validating constructors
//! - **State**: [`AppState`] owns the snapshot and saves it through a
//!   [`KeyValueStore`] after every mutation
//! - **Storage**: SQLite key-value table and study log, TOML configuration
//!
//! ## Key Components
//!
//! - [`GradeBoundaryTable`]: percentage to letter/GPA mapping
//! - [`AppState`]: command surface over the snapshot
//! - [`Database`]: SQLite persistence
//! - [`Config`]: application configuration management

pub mod app;
pub mod course;
pub mod error;
pub mod grading;
pub mod session;
pub mod storage;

pub use app::AppState;
pub use course::{
    Course, CourseUpdate, Evaluation, EvaluationKind, EvaluationUpdate, GradeStatus,
    NewEvaluation, Weight,
};
pub use error::{BoundaryError, ConfigError, CoreError, Result, StorageError, ValidationError};
pub use grading::{
    CourseGrade, CourseResult, GradeBoundary, GradeBoundaryTable, LetterGrade, OverallStats,
    StatsScope, TargetProjection, WeightPlan,
};
pub use session::{GpaFormat, Session, Settings};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, StudyKind};
