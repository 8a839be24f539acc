use clap::Subcommand;
use studyroom_core::GpaFormat;

use super::{open_state, print_json, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show grading settings
    Show,
    /// Set how GPA values are printed
    GpaFormat {
        /// one-decimal, two-decimals or out-of-scale
        format: GpaFormat,
    },
}

pub fn run(action: SettingsAction) -> CliResult {
    let mut state = open_state()?;

    match action {
        SettingsAction::Show => print_json(state.settings())?,
        SettingsAction::GpaFormat { format } => {
            state.set_gpa_format(format);
            println!("ok");
        }
    }
    Ok(())
}
