use clap::Subcommand;
use serde_json::json;
use studyroom_core::{Config, StatsScope};

use super::{open_state, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Credit-weighted GPA and average
    Overall {
        /// global or session; defaults to display.default_scope
        #[arg(long)]
        scope: Option<StatsScope>,
    },
    /// Per-course results feeding the GPA
    Courses {
        #[arg(long)]
        scope: Option<StatsScope>,
    },
}

pub fn run(action: StatsAction) -> CliResult {
    let state = open_state()?;

    match action {
        StatsAction::Overall { scope } => {
            let scope = resolve_scope(scope)?;
            match state.overall_stats(scope) {
                Some(stats) => {
                    let formatted =
                        state.format_gpa(stats.overall_gpa, state.grade_boundaries());
                    print_json(&json!({
                        "scope": scope,
                        "stats": stats,
                        "formattedGpa": formatted,
                    }))?;
                }
                None => println!("no graded courses"),
            }
        }
        StatsAction::Courses { scope } => {
            let scope = resolve_scope(scope)?;
            print_json(&state.course_results(scope))?;
        }
    }
    Ok(())
}

fn resolve_scope(scope: Option<StatsScope>) -> CliResult<StatsScope> {
    match scope {
        Some(scope) => Ok(scope),
        None => Ok(Config::load()?.display.default_scope.parse()?),
    }
}
