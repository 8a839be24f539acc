pub mod boundary;
pub mod config;
pub mod course;
pub mod eval;
pub mod grade;
pub mod session;
pub mod settings;
pub mod stats;
pub mod study;

use serde::Serialize;
use studyroom_core::{AppState, Config, Database};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Open the configured database and load the snapshot from it.
pub(crate) fn open_state() -> CliResult<AppState<Database>> {
    let db = open_database()?;
    Ok(AppState::load(db)?)
}

pub(crate) fn open_database() -> CliResult<Database> {
    let config = Config::load()?;
    let path = config.database_path()?;
    Ok(Database::open_at(&path)?)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
