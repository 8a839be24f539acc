use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "studyroom", version, about = "Studyroom CLI: courses, grades and study blocks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Course management
    Course {
        #[command(subcommand)]
        action: commands::course::CourseAction,
    },
    /// Evaluations within a course
    Eval {
        #[command(subcommand)]
        action: commands::eval::EvalAction,
    },
    /// Course grades and target projections
    Grade {
        #[command(subcommand)]
        action: commands::grade::GradeAction,
    },
    /// GPA statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Grade boundary tables
    Boundary {
        #[command(subcommand)]
        action: commands::boundary::BoundaryAction,
    },
    /// Academic sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Grading settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Pomodoro study log
    Study {
        #[command(subcommand)]
        action: commands::study::StudyAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init();

    let result = match cli.command {
        Commands::Course { action } => commands::course::run(action),
        Commands::Eval { action } => commands::eval::run(action),
        Commands::Grade { action } => commands::grade::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Boundary { action } => commands::boundary::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Study { action } => commands::study::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
