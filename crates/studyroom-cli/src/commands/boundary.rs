//! Grade boundary commands.
//!
//! Without `--course` they act on the global table. With `--course`, edits
//! start from the course's effective table and store the result as its
//! custom table.

use clap::Subcommand;
use serde_json::json;
use studyroom_core::{AppState, Database, GradeBoundaryTable};

use super::{open_state, print_json, CliResult};

#[derive(Subcommand)]
pub enum BoundaryAction {
    /// Show the table
    List {
        #[arg(long)]
        course: Option<String>,
    },
    /// Letter and GPA for a percentage
    Lookup {
        percentage: f64,
        #[arg(long)]
        course: Option<String>,
    },
    /// Move the lower threshold of a band
    SetMin {
        /// Band index, 0 is the highest band
        index: usize,
        min: u8,
        #[arg(long)]
        course: Option<String>,
    },
    /// Insert a band below another
    Insert {
        /// Index of the band above the new one
        after: usize,
        letter: String,
        gpa: f64,
        #[arg(long)]
        course: Option<String>,
    },
    /// Remove a band
    Delete {
        index: usize,
        #[arg(long)]
        course: Option<String>,
    },
    /// Restore the default table, or drop a course's custom table
    Reset {
        #[arg(long)]
        course: Option<String>,
    },
}

pub fn run(action: BoundaryAction) -> CliResult {
    let mut state = open_state()?;

    match action {
        BoundaryAction::List { course } => {
            let table = table_for(&state, course.as_deref())?;
            print_json(table.bands())?;
        }
        BoundaryAction::Lookup { percentage, course } => {
            let table = table_for(&state, course.as_deref())?;
            print_json(&json!({
                "percentage": percentage,
                "letter": table.lookup_letter(percentage),
                "gpa": table.lookup_gpa(percentage),
            }))?;
        }
        BoundaryAction::SetMin { index, min, course } => {
            let table = table_for(&state, course.as_deref())?.set_boundary_min(index, min)?;
            store(&mut state, course.as_deref(), table)?;
        }
        BoundaryAction::Insert {
            after,
            letter,
            gpa,
            course,
        } => {
            let table = table_for(&state, course.as_deref())?.insert_boundary(after, letter, gpa)?;
            store(&mut state, course.as_deref(), table)?;
        }
        BoundaryAction::Delete { index, course } => {
            let table = table_for(&state, course.as_deref())?.delete_boundary(index)?;
            store(&mut state, course.as_deref(), table)?;
        }
        BoundaryAction::Reset { course } => match course {
            Some(id) => {
                state.set_course_custom_boundaries(&id, None)?;
                println!("course now uses the global table");
            }
            None => {
                state.reset_grade_boundaries_to_default();
                print_json(state.grade_boundaries().bands())?;
            }
        },
    }
    Ok(())
}

fn table_for<'a>(
    state: &'a AppState<Database>,
    course: Option<&str>,
) -> CliResult<&'a GradeBoundaryTable> {
    match course {
        Some(id) => Ok(state
            .course_boundaries(id)
            .ok_or_else(|| format!("course not found: {id}"))?),
        None => Ok(state.grade_boundaries()),
    }
}

fn store(state: &mut AppState<Database>, course: Option<&str>, table: GradeBoundaryTable) -> CliResult {
    print_json(table.bands())?;
    match course {
        Some(id) => state.set_course_custom_boundaries(id, Some(table))?,
        None => state.update_grade_boundaries(table),
    }
    Ok(())
}
