//! Course management commands.

use clap::Subcommand;
use serde_json::json;
use studyroom_core::{AppState, Config, Course, CourseUpdate, Database};

use super::{open_state, print_json, CliResult};

#[derive(Subcommand)]
pub enum CourseAction {
    /// Add a course to the active session
    Add {
        /// Course name
        name: String,
        /// Target percentage (0-100)
        #[arg(long)]
        objective: f64,
        /// Credits, weight of the course in the GPA
        #[arg(long)]
        credits: f64,
    },
    /// List courses of the active session
    List {
        /// Include courses from every session
        #[arg(long)]
        all: bool,
    },
    /// Show a course with its evaluations and grade
    Show {
        /// Course ID
        id: String,
    },
    /// Update a course
    Update {
        /// Course ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        objective: Option<f64>,
        #[arg(long)]
        credits: Option<f64>,
        /// Move the course to another session
        #[arg(long)]
        session: Option<String>,
    },
    /// Delete a course and its evaluations
    Delete {
        /// Course ID
        id: String,
    },
}

pub fn run(action: CourseAction) -> CliResult {
    let mut state = open_state()?;

    match action {
        CourseAction::Add {
            name,
            objective,
            credits,
        } => {
            let course = state.add_course(&name, objective, credits)?;
            print_json(&course)?;
        }
        CourseAction::List { all } => {
            let active = state.active_session().map(|s| s.id.clone());
            let rows: Vec<_> = state
                .courses()
                .iter()
                .filter(|c| all || Some(&c.session_id) == active.as_ref())
                .map(|c| summary(&state, c))
                .collect();
            print_json(&rows)?;
        }
        CourseAction::Show { id } => {
            let course = state
                .course(&id)
                .ok_or_else(|| format!("course not found: {id}"))?;
            let mut value = serde_json::to_value(course)?;
            value["grade"] = serde_json::to_value(state.course_grade(&id))?;
            value["letterGrade"] = serde_json::to_value(state.course_letter_and_gpa(&id))?;
            if Config::load()?.display.show_targets {
                value["target"] = serde_json::to_value(state.course_target(&id))?;
            }
            print_json(&value)?;
        }
        CourseAction::Update {
            id,
            name,
            objective,
            credits,
            session,
        } => {
            let update = CourseUpdate {
                name,
                objective,
                credits,
                session_id: session,
            };
            let course = state.update_course(&id, &update)?;
            print_json(&course)?;
        }
        CourseAction::Delete { id } => {
            let removed = state.delete_course(&id)?;
            println!(
                "deleted course {} ({} evaluations)",
                removed.name,
                removed.evaluations.len()
            );
        }
    }
    Ok(())
}

fn summary(state: &AppState<Database>, course: &Course) -> serde_json::Value {
    let grade = state.course_grade(&course.id);
    let letter = state.course_letter_and_gpa(&course.id);
    json!({
        "id": course.id,
        "name": course.name,
        "credits": course.credits,
        "objective": course.objective,
        "sessionId": course.session_id,
        "evaluations": course.evaluations.len(),
        "percentage": grade.filter(|g| g.has_data()).map(|g| g.percentage),
        "letter": letter.map(|l| l.letter),
    })
}
