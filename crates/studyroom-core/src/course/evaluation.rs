//! Evaluations: graded (or upcoming) pieces of work within a course.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::check_percentage;
use crate::error::ValidationError;

/// Categorization only; it never affects grade math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationKind {
    /// Coursework
    #[default]
    Travail,
    /// Exam
    Examen,
}

impl std::str::FromStr for EvaluationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "travail" | "work" => Ok(EvaluationKind::Travail),
            "examen" | "exam" => Ok(EvaluationKind::Examen),
            other => Err(format!("unknown evaluation kind: {other}")),
        }
    }
}

/// Contribution of an evaluation to its course grade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weight {
    /// Fixed by the user, a percentage in `[0, 100]`.
    Manual(f64),
    /// Share of whatever the manual weights leave over.
    Auto,
}

impl Weight {
    pub fn manual(&self) -> Option<f64> {
        match self {
            Weight::Manual(value) => Some(*value),
            Weight::Auto => None,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Weight::Auto)
    }
}

/// Whether the evaluation already has a grade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeStatus {
    /// Planned; counts for weight planning but not for the average.
    Scheduled,
    /// Graded, `note` is a percentage in `[0, 100]`.
    Completed { note: f64 },
}

/// An assignment or exam.
///
/// Persisted in the flat `note` / `isScheduled` / `weight` / `isAutoWeight`
/// shape; loading rejects records that break the scheduled-has-no-note rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EvaluationRecord", into = "EvaluationRecord")]
pub struct Evaluation {
    pub id: String,
    pub name: String,
    pub kind: EvaluationKind,
    pub weight: Weight,
    pub status: GradeStatus,
    pub date: Option<NaiveDate>,
}

impl Evaluation {
    /// Build and validate a new evaluation with a fresh id.
    pub fn create(new: NewEvaluation) -> Result<Self, ValidationError> {
        let evaluation = Self {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            kind: new.kind,
            weight: new.weight,
            status: new.status,
            date: new.date,
        };
        evaluation.validate()?;
        Ok(evaluation)
    }

    pub fn note(&self) -> Option<f64> {
        match self.status {
            GradeStatus::Completed { note } => Some(note),
            GradeStatus::Scheduled => None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.status, GradeStatus::Scheduled)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if let Weight::Manual(value) = self.weight {
            check_percentage("weight", value)?;
        }
        if let GradeStatus::Completed { note } = self.status {
            check_percentage("note", note)?;
        }
        Ok(())
    }
}

/// Input for creating an evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvaluation {
    pub name: String,
    pub kind: EvaluationKind,
    pub weight: Weight,
    pub status: GradeStatus,
    pub date: Option<NaiveDate>,
}

impl NewEvaluation {
    pub fn completed(name: impl Into<String>, note: f64, weight: Weight) -> Self {
        Self {
            name: name.into(),
            kind: EvaluationKind::default(),
            weight,
            status: GradeStatus::Completed { note },
            date: None,
        }
    }

    pub fn scheduled(name: impl Into<String>, weight: Weight) -> Self {
        Self {
            name: name.into(),
            kind: EvaluationKind::default(),
            weight,
            status: GradeStatus::Scheduled,
            date: None,
        }
    }

    pub fn with_kind(mut self, kind: EvaluationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationUpdate {
    pub name: Option<String>,
    pub kind: Option<EvaluationKind>,
    pub weight: Option<Weight>,
    pub status: Option<GradeStatus>,
    /// `Some(None)` clears the date.
    pub date: Option<Option<NaiveDate>>,
}

impl EvaluationUpdate {
    /// Produce the replacement evaluation. The id never changes.
    pub fn apply(&self, current: &Evaluation) -> Result<Evaluation, ValidationError> {
        let updated = Evaluation {
            id: current.id.clone(),
            name: self
                .name
                .as_deref()
                .map(|n| n.trim().to_string())
                .unwrap_or_else(|| current.name.clone()),
            kind: self.kind.unwrap_or(current.kind),
            weight: self.weight.unwrap_or(current.weight),
            status: self.status.unwrap_or(current.status),
            date: self.date.unwrap_or(current.date),
        };
        updated.validate()?;
        Ok(updated)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationRecord {
    id: String,
    name: String,
    #[serde(default)]
    note: Option<f64>,
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    is_auto_weight: bool,
    #[serde(rename = "type", default)]
    kind: EvaluationKind,
    #[serde(default)]
    is_scheduled: bool,
    #[serde(default)]
    date: Option<NaiveDate>,
}

impl TryFrom<EvaluationRecord> for Evaluation {
    type Error = ValidationError;

    fn try_from(record: EvaluationRecord) -> Result<Self, Self::Error> {
        let status = match (record.is_scheduled, record.note) {
            (true, None) => GradeStatus::Scheduled,
            (false, Some(note)) => GradeStatus::Completed { note },
            (true, Some(_)) => {
                return Err(ValidationError::InvalidValue {
                    field: "note",
                    message: "a scheduled evaluation cannot have a note".to_string(),
                })
            }
            (false, None) => {
                return Err(ValidationError::InvalidValue {
                    field: "note",
                    message: "a completed evaluation needs a note".to_string(),
                })
            }
        };
        let weight = if record.is_auto_weight {
            Weight::Auto
        } else {
            Weight::Manual(record.weight)
        };
        let evaluation = Evaluation {
            id: record.id,
            name: record.name,
            kind: record.kind,
            weight,
            status,
            date: record.date,
        };
        evaluation.validate()?;
        Ok(evaluation)
    }
}

impl From<Evaluation> for EvaluationRecord {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            note: evaluation.note(),
            is_scheduled: evaluation.is_scheduled(),
            weight: evaluation.weight.manual().unwrap_or(0.0),
            is_auto_weight: evaluation.weight.is_auto(),
            id: evaluation.id,
            name: evaluation.name,
            kind: evaluation.kind,
            date: evaluation.date,
        }
    }
}
