//! Courses and their evaluations.

mod evaluation;

pub use evaluation::{
    Evaluation, EvaluationKind, EvaluationUpdate, GradeStatus, NewEvaluation, Weight,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::grading::{GradeBoundaryTable, WeightPlan, WEIGHT_EPSILON};

/// A course followed during a session.
///
/// Loading runs [`Course::validate`], so a stored course with bad credits or
/// manual weights over 100% is refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CourseRecord")]
pub struct Course {
    pub id: String,
    pub name: String,
    /// Target percentage.
    pub objective: f64,
    /// Weight of the course in GPA aggregation, always > 0.
    pub credits: f64,
    pub session_id: String,
    #[serde(default)]
    pub evaluations: Vec<Evaluation>,
    /// Overrides the global table when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_grade_boundaries: Option<GradeBoundaryTable>,
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Build and validate a course with no evaluations.
    pub fn create(
        name: &str,
        objective: f64,
        credits: f64,
        session_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let course = Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            objective,
            credits,
            session_id: session_id.into(),
            evaluations: Vec::new(),
            custom_grade_boundaries: None,
            created_at: Utc::now(),
        };
        course.validate()?;
        Ok(course)
    }

    pub fn evaluation(&self, id: &str) -> Option<&Evaluation> {
        self.evaluations.iter().find(|e| e.id == id)
    }

    /// The table this course grades against.
    pub fn boundaries<'a>(&'a self, global: &'a GradeBoundaryTable) -> &'a GradeBoundaryTable {
        self.custom_grade_boundaries.as_ref().unwrap_or(global)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        check_percentage("objective", self.objective)?;
        check_credits(self.credits)?;
        let manual_total = WeightPlan::for_evaluations(&self.evaluations).manual_total;
        if manual_total > 100.0 + WEIGHT_EPSILON {
            return Err(ValidationError::InvalidValue {
                field: "weight",
                message: format!("manual weights add up to {manual_total}%, above 100%"),
            });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseRecord {
    id: String,
    name: String,
    objective: f64,
    credits: f64,
    session_id: String,
    #[serde(default)]
    evaluations: Vec<Evaluation>,
    #[serde(default)]
    custom_grade_boundaries: Option<GradeBoundaryTable>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CourseRecord> for Course {
    type Error = ValidationError;

    fn try_from(record: CourseRecord) -> Result<Self, Self::Error> {
        let course = Course {
            id: record.id,
            name: record.name,
            objective: record.objective,
            credits: record.credits,
            session_id: record.session_id,
            evaluations: record.evaluations,
            custom_grade_boundaries: record.custom_grade_boundaries,
            created_at: record.created_at,
        };
        course.validate()?;
        Ok(course)
    }
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseUpdate {
    pub name: Option<String>,
    pub objective: Option<f64>,
    pub credits: Option<f64>,
    pub session_id: Option<String>,
}

impl CourseUpdate {
    /// Produce the replacement course. Evaluations and boundaries carry over.
    pub fn apply(&self, current: &Course) -> Result<Course, ValidationError> {
        let mut updated = current.clone();
        if let Some(name) = &self.name {
            updated.name = name.trim().to_string();
        }
        if let Some(objective) = self.objective {
            updated.objective = objective;
        }
        if let Some(credits) = self.credits {
            updated.credits = credits;
        }
        if let Some(session_id) = &self.session_id {
            updated.session_id = session_id.clone();
        }
        updated.validate()?;
        Ok(updated)
    }
}

pub(crate) fn check_percentage(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::PercentageOutOfRange { field, value })
    }
}

fn check_credits(credits: f64) -> Result<f64, ValidationError> {
    if credits.is_finite() && credits > 0.0 {
        Ok(credits)
    } else {
        Err(ValidationError::InvalidValue {
            field: "credits",
            message: format!("must be a positive number (got {credits})"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_validates_fields() {
        let course = Course::create(" Algebra ", 80.0, 3.0, "s1").unwrap();
        assert_eq!(course.name, "Algebra");
        assert!(course.evaluations.is_empty());

        assert_eq!(
            Course::create("", 80.0, 3.0, "s1"),
            Err(ValidationError::EmptyField("name"))
        );
        assert!(matches!(
            Course::create("Algebra", 120.0, 3.0, "s1"),
            Err(ValidationError::PercentageOutOfRange { field: "objective", .. })
        ));
        assert!(matches!(
            Course::create("Algebra", 80.0, 0.0, "s1"),
            Err(ValidationError::InvalidValue { field: "credits", .. })
        ));
        assert!(Course::create("Algebra", 80.0, f64::NAN, "s1").is_err());
    }

    #[test]
    fn update_replaces_selected_fields() {
        let course = Course::create("Algebra", 80.0, 3.0, "s1").unwrap();
        let update = CourseUpdate {
            credits: Some(4.0),
            ..Default::default()
        };
        let updated = update.apply(&course).unwrap();
        assert_eq!(updated.credits, 4.0);
        assert_eq!(updated.name, "Algebra");
        assert_eq!(updated.id, course.id);

        let bad = CourseUpdate {
            objective: Some(-1.0),
            ..Default::default()
        };
        assert!(bad.apply(&course).is_err());
    }

    #[test]
    fn loading_revalidates() {
        let course = Course::create("Algebra", 80.0, 3.0, "s1").unwrap();
        let json = serde_json::to_value(&course).unwrap();
        let loaded: Course = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(loaded, course);

        let mut zero_credits = json.clone();
        zero_credits["credits"] = serde_json::json!(0.0);
        assert!(serde_json::from_value::<Course>(zero_credits).is_err());

        let mut overweight = json;
        overweight["evaluations"] = serde_json::json!([
            {"id": "e1", "name": "Midterm", "note": 70.0, "weight": 60.0},
            {"id": "e2", "name": "Final", "note": 80.0, "weight": 50.0}
        ]);
        assert!(serde_json::from_value::<Course>(overweight).is_err());
    }

    #[test]
    fn boundaries_prefers_custom_table() {
        let global = GradeBoundaryTable::default();
        let mut course = Course::create("Algebra", 80.0, 3.0, "s1").unwrap();
        assert_eq!(course.boundaries(&global).len(), 12);

        course.custom_grade_boundaries = Some(global.delete_boundary(0).unwrap());
        assert_eq!(course.boundaries(&global).len(), 11);
    }
}
