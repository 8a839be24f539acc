use clap::Subcommand;
use serde_json::json;
use studyroom_core::Config;

use super::{open_state, print_json, CliResult};

#[derive(Subcommand)]
pub enum GradeAction {
    /// Current grade, letter and GPA of a course, with the target
    /// projection unless display.show_targets is off
    Show {
        /// Course ID
        course_id: String,
    },
    /// Average needed on scheduled work to reach the objective
    Target {
        /// Course ID
        course_id: String,
    },
}

pub fn run(action: GradeAction) -> CliResult {
    let state = open_state()?;

    match action {
        GradeAction::Show { course_id } => {
            let grade = state
                .course_grade(&course_id)
                .ok_or_else(|| format!("course not found: {course_id}"))?;
            let letter = state.course_letter_and_gpa(&course_id);
            let formatted = match (&letter, state.course_boundaries(&course_id)) {
                (Some(l), Some(table)) => Some(state.format_gpa(l.gpa, table)),
                _ => None,
            };
            let mut value = json!({
                "grade": grade,
                "letter": letter.as_ref().map(|l| l.letter.clone()),
                "gpa": letter.as_ref().map(|l| l.gpa),
                "formattedGpa": formatted,
            });
            if Config::load()?.display.show_targets {
                value["target"] = serde_json::to_value(state.course_target(&course_id))?;
            }
            print_json(&value)?;
        }
        GradeAction::Target { course_id } => {
            let course = state
                .course(&course_id)
                .ok_or_else(|| format!("course not found: {course_id}"))?;
            match state.course_target(&course_id) {
                Some(target) => {
                    print_json(&target)?;
                    if !target.reachable {
                        eprintln!(
                            "warning: objective {}% is out of reach (needs {:.1}%)",
                            course.objective, target.raw_required
                        );
                    }
                }
                None => println!("no scheduled evaluations left"),
            }
        }
    }
    Ok(())
}
