//! Academic sessions (terms) and global grading settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::grading::GradeBoundaryTable;

/// Name given to the session created when none exists.
pub const DEFAULT_SESSION_NAME: &str = "Session 1";

/// A grouping of courses used to scope GPA statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn create(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        })
    }

    pub fn default_session() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: DEFAULT_SESSION_NAME.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// How GPA values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GpaFormat {
    /// `3.7`
    OneDecimal,
    /// `3.70`
    #[default]
    TwoDecimals,
    /// `3.70/4.00`, scaled by the table's best GPA
    OutOfScale,
}

impl GpaFormat {
    pub fn format(&self, gpa: f64, scale: f64) -> String {
        match self {
            GpaFormat::OneDecimal => format!("{gpa:.1}"),
            GpaFormat::TwoDecimals => format!("{gpa:.2}"),
            GpaFormat::OutOfScale => format!("{gpa:.2}/{scale:.2}"),
        }
    }
}

impl std::str::FromStr for GpaFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-decimal" => Ok(GpaFormat::OneDecimal),
            "two-decimals" => Ok(GpaFormat::TwoDecimals),
            "out-of-scale" => Ok(GpaFormat::OutOfScale),
            other => Err(format!(
                "unknown GPA format '{other}' (expected one-decimal, two-decimals or out-of-scale)"
            )),
        }
    }
}

/// Global defaults shared by every course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub gpa_format: GpaFormat,
    /// Table used by courses without custom boundaries.
    #[serde(default)]
    pub grade_boundaries: GradeBoundaryTable,
    #[serde(default)]
    pub active_session_id: Option<String>,
}
