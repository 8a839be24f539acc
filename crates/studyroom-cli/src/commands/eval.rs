//! Evaluation commands.

use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;
use studyroom_core::{
    AppState, EvaluationKind, EvaluationUpdate, GradeStatus, KeyValueStore, NewEvaluation, Weight,
};

use super::{open_state, print_json, CliResult};

#[derive(Subcommand)]
pub enum EvalAction {
    /// Add an evaluation; without --note it is scheduled
    Add {
        /// Course ID
        course_id: String,
        /// Evaluation name
        name: String,
        /// Grade obtained, percentage (0-100)
        #[arg(long)]
        note: Option<f64>,
        /// Manual weight percentage; omitted means auto
        #[arg(long)]
        weight: Option<f64>,
        /// travail or examen
        #[arg(long, default_value = "travail")]
        kind: EvaluationKind,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List evaluations with their effective weights
    List {
        /// Course ID
        course_id: String,
    },
    /// Update an evaluation
    Update {
        /// Course ID
        course_id: String,
        /// Evaluation ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Record a grade
        #[arg(long, conflicts_with = "scheduled")]
        note: Option<f64>,
        /// Clear the grade and mark as scheduled
        #[arg(long)]
        scheduled: bool,
        /// New manual weight
        #[arg(long, conflicts_with = "auto")]
        weight: Option<f64>,
        /// Switch to an automatic weight
        #[arg(long)]
        auto: bool,
        #[arg(long)]
        kind: Option<EvaluationKind>,
        #[arg(long, conflicts_with = "clear_date")]
        date: Option<NaiveDate>,
        #[arg(long)]
        clear_date: bool,
    },
    /// Delete an evaluation
    Delete {
        /// Course ID
        course_id: String,
        /// Evaluation ID
        id: String,
    },
}

pub fn run(action: EvalAction) -> CliResult {
    let mut state = open_state()?;

    match action {
        EvalAction::Add {
            course_id,
            name,
            note,
            weight,
            kind,
            date,
        } => {
            let weight = weight.map_or(Weight::Auto, Weight::Manual);
            let mut new = match note {
                Some(note) => NewEvaluation::completed(name, note, weight),
                None => NewEvaluation::scheduled(name, weight),
            }
            .with_kind(kind);
            if let Some(date) = date {
                new = new.with_date(date);
            }
            let evaluation = state.add_evaluation(&course_id, new)?;
            warn_if_starved(&state, &course_id);
            print_json(&evaluation)?;
        }
        EvalAction::List { course_id } => {
            let course = state
                .course(&course_id)
                .ok_or_else(|| format!("course not found: {course_id}"))?;
            let weights = state.effective_weights(&course_id).unwrap_or_default();
            let rows: Vec<_> = course
                .evaluations
                .iter()
                .zip(weights)
                .map(|(evaluation, (_, effective))| {
                    json!({
                        "id": evaluation.id,
                        "name": evaluation.name,
                        "kind": evaluation.kind,
                        "note": evaluation.note(),
                        "auto": evaluation.weight.is_auto(),
                        "effectiveWeight": effective,
                        "date": evaluation.date,
                    })
                })
                .collect();
            print_json(&rows)?;
        }
        EvalAction::Update {
            course_id,
            id,
            name,
            note,
            scheduled,
            weight,
            auto,
            kind,
            date,
            clear_date,
        } => {
            let status = match (note, scheduled) {
                (Some(note), _) => Some(GradeStatus::Completed { note }),
                (None, true) => Some(GradeStatus::Scheduled),
                (None, false) => None,
            };
            let weight = match (weight, auto) {
                (Some(value), _) => Some(Weight::Manual(value)),
                (None, true) => Some(Weight::Auto),
                (None, false) => None,
            };
            let date = if clear_date { Some(None) } else { date.map(Some) };
            let update = EvaluationUpdate {
                name,
                kind,
                weight,
                status,
                date,
            };
            let evaluation = state.update_evaluation(&course_id, &id, &update)?;
            warn_if_starved(&state, &course_id);
            print_json(&evaluation)?;
        }
        EvalAction::Delete { course_id, id } => {
            let removed = state.delete_evaluation(&course_id, &id)?;
            println!("deleted evaluation {}", removed.name);
        }
    }
    Ok(())
}

fn warn_if_starved<S: KeyValueStore>(state: &AppState<S>, course_id: &str) {
    if state.weight_plan(course_id).is_some_and(|p| p.auto_starved()) {
        eprintln!("warning: manual weights reach 100%, auto-weighted evaluations count for 0%");
    }
}
