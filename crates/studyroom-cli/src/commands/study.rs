//! Pomodoro study log commands.
//!
//! Blocks are logged once finished; there is no countdown here.

use chrono::{Duration, Utc};
use clap::Subcommand;
use serde_json::json;
use studyroom_core::{Config, StudyKind};

use super::{open_database, open_state, print_json, CliResult};

#[derive(Subcommand)]
pub enum StudyAction {
    /// Log a finished block ending now
    Log {
        /// focus or break
        #[arg(long, default_value = "focus")]
        kind: StudyKind,
        /// Course the block was spent on
        #[arg(long)]
        course: Option<String>,
        /// Duration; defaults to the configured focus or short break length
        #[arg(long)]
        minutes: Option<u64>,
    },
    /// Most recent blocks
    Recent {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Today's totals
    Today,
    /// All-time totals
    All,
    /// Focus minutes per course
    Courses,
}

pub fn run(action: StudyAction) -> CliResult {
    match action {
        StudyAction::Log {
            kind,
            course,
            minutes,
        } => {
            let state = open_state()?;
            if let Some(id) = &course {
                state
                    .course(id)
                    .ok_or_else(|| format!("course not found: {id}"))?;
            }
            let minutes = match minutes {
                Some(minutes) => minutes,
                None => {
                    let study = Config::load()?.study;
                    u64::from(match kind {
                        StudyKind::Focus => study.focus_duration,
                        StudyKind::Break => study.short_break,
                    })
                }
            };

            let completed_at = Utc::now();
            let started_at = completed_at - Duration::minutes(i64::try_from(minutes)?);
            let db = state.into_store();
            let id = db.record_study_session(kind, course.as_deref(), minutes, started_at, completed_at)?;
            print_json(&json!({
                "id": id,
                "kind": kind.as_str(),
                "courseId": course,
                "minutes": minutes,
            }))?;
        }
        StudyAction::Recent { limit } => {
            let db = open_database()?;
            print_json(&db.recent_study_sessions(limit)?)?;
        }
        StudyAction::Today => {
            let db = open_database()?;
            print_json(&db.study_stats_today()?)?;
        }
        StudyAction::All => {
            let db = open_database()?;
            print_json(&db.study_stats_all()?)?;
        }
        StudyAction::Courses => {
            let state = open_state()?;
            let rows: Vec<_> = state
                .store()
                .focus_minutes_by_course()?
                .into_iter()
                .map(|(course_id, minutes)| {
                    let name = state.course(&course_id).map(|c| c.name.clone());
                    json!({ "courseId": course_id, "name": name, "minutes": minutes })
                })
                .collect();
            print_json(&rows)?;
        }
    }
    Ok(())
}
