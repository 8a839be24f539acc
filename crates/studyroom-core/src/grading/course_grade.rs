//! Course percentage from completed evaluations.
//!
//! Scheduled evaluations take part in weight resolution (they hold a share of
//! the 100%) but never in the weighted average.

use serde::Serialize;

use super::weight::WeightPlan;
use crate::course::{Evaluation, GradeStatus};

/// Current standing of a course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGrade {
    /// Whole percentage, 0 when there is nothing graded yet.
    pub percentage: f64,
    pub completed_count: usize,
    /// Effective weight carried by the completed evaluations.
    pub completed_weight: f64,
    /// Effective weight of all evaluations, scheduled included.
    pub planned_weight: f64,
}

impl CourseGrade {
    /// Distinguishes a real 0% from "nothing graded yet".
    pub fn has_data(&self) -> bool {
        self.completed_count > 0
    }
}

/// Round to the nearest integer, halves going up.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn course_grade(evaluations: &[Evaluation]) -> CourseGrade {
    let plan = WeightPlan::for_evaluations(evaluations);
    let mut completed_count = 0;
    let mut completed_weight = 0.0;
    let mut weighted_sum = 0.0;

    for evaluation in evaluations {
        if let GradeStatus::Completed { note } = evaluation.status {
            let weight = plan.effective(evaluation);
            completed_count += 1;
            completed_weight += weight;
            weighted_sum += note * weight;
        }
    }

    let percentage = if completed_weight > 0.0 {
        round_half_up(weighted_sum / completed_weight)
    } else {
        0.0
    };

    CourseGrade {
        percentage,
        completed_count,
        completed_weight,
        planned_weight: plan.total(),
    }
}

/// Average needed on the remaining work to reach the course objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetProjection {
    /// Required average, clamped to `[0, 100]` for display.
    pub required: f64,
    /// Unclamped value; above 100 means the objective is out of reach.
    pub raw_required: f64,
    pub reachable: bool,
    pub scheduled_weight: f64,
}

/// `None` when no scheduled evaluation carries any weight.
pub fn target_projection(evaluations: &[Evaluation], objective: f64) -> Option<TargetProjection> {
    let plan = WeightPlan::for_evaluations(evaluations);
    let mut earned = 0.0;
    let mut scheduled_weight = 0.0;

    for evaluation in evaluations {
        let weight = plan.effective(evaluation);
        match evaluation.status {
            GradeStatus::Completed { note } => earned += note * weight,
            GradeStatus::Scheduled => scheduled_weight += weight,
        }
    }

    if scheduled_weight <= 0.0 {
        return None;
    }

    let raw_required = (objective * 100.0 - earned) / scheduled_weight;
    Some(TargetProjection {
        required: raw_required.clamp(0.0, 100.0),
        raw_required,
        reachable: raw_required <= 100.0,
        scheduled_weight,
    })
}
