//! Effective evaluation weights.
//!
//! Manual weights are honored as given; whatever they leave of 100% is split
//! evenly among the auto-weighted evaluations. Effective weights are
//! recomputed on every read and never stored.

use crate::course::{Evaluation, Weight};
use crate::error::CoreError;

/// Tolerance for comparing weight sums, so 33.33 + 33.33 + 33.34 fits.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Resolved weights for one course.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightPlan {
    pub manual_total: f64,
    pub auto_count: usize,
    /// Effective weight of each auto evaluation.
    pub auto_share: f64,
}

impl WeightPlan {
    pub fn for_evaluations(evaluations: &[Evaluation]) -> Self {
        let mut manual_total = 0.0;
        let mut auto_count = 0;
        for evaluation in evaluations {
            match evaluation.weight {
                Weight::Manual(value) => manual_total += value,
                Weight::Auto => auto_count += 1,
            }
        }
        let auto_share = if auto_count > 0 {
            (100.0 - manual_total).max(0.0) / auto_count as f64
        } else {
            0.0
        };
        Self {
            manual_total,
            auto_count,
            auto_share,
        }
    }

    pub fn effective(&self, evaluation: &Evaluation) -> f64 {
        match evaluation.weight {
            Weight::Manual(value) => value,
            Weight::Auto => self.auto_share,
        }
    }

    /// Sum of all effective weights.
    pub fn total(&self) -> f64 {
        self.manual_total + self.auto_share * self.auto_count as f64
    }

    /// What is left for auto evaluations, never negative.
    pub fn available(&self) -> f64 {
        (100.0 - self.manual_total).max(0.0)
    }

    /// Auto evaluations exist but the manual weights already use up 100%.
    pub fn auto_starved(&self) -> bool {
        self.auto_count > 0 && self.available() <= WEIGHT_EPSILON
    }
}

/// Effective weight of every evaluation, in order.
pub fn effective_weights(evaluations: &[Evaluation]) -> Vec<(&Evaluation, f64)> {
    let plan = WeightPlan::for_evaluations(evaluations);
    evaluations.iter().map(|e| (e, plan.effective(e))).collect()
}

/// Check that giving `evaluation_id` the manual weight `requested` keeps the
/// manual total within 100%.
///
/// The evaluation's previous contribution is excluded, so re-saving an
/// unchanged weight always passes. `evaluation_id` is `None` for a new
/// evaluation.
pub fn check_manual_weight(
    evaluations: &[Evaluation],
    evaluation_id: Option<&str>,
    requested: f64,
) -> Result<(), CoreError> {
    let others: f64 = evaluations
        .iter()
        .filter(|e| Some(e.id.as_str()) != evaluation_id)
        .filter_map(|e| e.weight.manual())
        .sum();
    if others + requested > 100.0 + WEIGHT_EPSILON {
        return Err(CoreError::WeightExceeded {
            requested,
            available: (100.0 - others).max(0.0),
        });
    }
    Ok(())
}
