use crate::cli::{actions::Action, commands, commands::logging, dispatch::handler, telemetry};
use anyhow::Result;

/// Parse the command line, initialize logging/tracing and return the action
/// to execute.
///
/// # Errors
/// Returns an error if subscriber initialization or argument dispatch fails.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let verbosity_level = logging::level_from(&matches);

    telemetry::init(Some(verbosity_level))?;

    let action = handler(&matches)?;

    Ok(action)
}
