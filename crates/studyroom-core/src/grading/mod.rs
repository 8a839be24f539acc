//! Grade aggregation and boundary resolution.
//!
//! Every function here is pure over a snapshot of courses: results are
//! recomputed on each read and nothing is cached.

mod boundary;
mod course_grade;
mod gpa;
mod weight;

pub use boundary::{GradeBoundary, GradeBoundaryTable};
pub use course_grade::{course_grade, round_half_up, target_projection, CourseGrade, TargetProjection};
pub use gpa::{aggregate, course_result, CourseResult, LetterGrade, OverallStats, StatsScope};
pub use weight::{check_manual_weight, effective_weights, WeightPlan, WEIGHT_EPSILON};
