//! Log output for the CLI.
//!
//! Filter precedence: `STUDYROOM_LOG`, then `RUST_LOG`, then the config's
//! `logging.level`. Logs go to stderr so stdout stays parseable JSON.

use studyroom_core::Config;
use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_env("STUDYROOM_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(Config::load_or_default().logging.level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
