use clap::Subcommand;
use serde_json::json;

use super::{open_state, print_json, CliResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// List sessions
    List,
    /// Create a session
    Add {
        name: String,
        /// Make it the active session
        #[arg(long)]
        activate: bool,
    },
    /// Rename a session
    Rename { id: String, name: String },
    /// Set the active session
    Use { id: String },
    /// Delete a session and its courses
    Delete { id: String },
}

pub fn run(action: SessionAction) -> CliResult {
    let mut state = open_state()?;

    match action {
        SessionAction::List => {
            let active = state.settings().active_session_id.clone();
            let rows: Vec<_> = state
                .sessions()
                .iter()
                .map(|s| {
                    json!({
                        "id": s.id,
                        "name": s.name,
                        "active": Some(&s.id) == active.as_ref(),
                        "courses": state.courses().iter().filter(|c| c.session_id == s.id).count(),
                    })
                })
                .collect();
            print_json(&rows)?;
        }
        SessionAction::Add { name, activate } => {
            let session = state.add_session(&name)?;
            if activate {
                state.set_active_session(&session.id)?;
            }
            print_json(&session)?;
        }
        SessionAction::Rename { id, name } => {
            let session = state.rename_session(&id, &name)?;
            print_json(&session)?;
        }
        SessionAction::Use { id } => {
            state.set_active_session(&id)?;
            println!("active session: {id}");
        }
        SessionAction::Delete { id } => {
            let removed = state.delete_session(&id)?;
            println!("deleted session {}", removed.name);
        }
    }
    Ok(())
}
