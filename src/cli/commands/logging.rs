use clap::{Arg, ArgAction, Command};
use tracing::Level;

/// Add the verbosity flag shared by every subcommand.
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new("verbosity")
            .short('v')
            .action(ArgAction::Count)
            .help("Verbosity: -v (warn), -vv (info), -vvv (debug), -vvvv (trace)"),
    )
}

/// Effective log level. `CONTAS_LOG_LEVEL` wins over `-v` occurrences so
/// containerized deployments can set a level without changing flags.
#[must_use]
pub fn level_from(matches: &clap::ArgMatches) -> Level {
    if let Ok(name) = std::env::var("CONTAS_LOG_LEVEL")
        && let Some(level) = level_by_name(&name)
    {
        return level;
    }

    match matches.get_one::<u8>("verbosity").map_or(0, |&v| v) {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn level_by_name(name: &str) -> Option<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_level_from_verbosity_flags() {
        let levels = [
            Level::ERROR,
            Level::WARN,
            Level::INFO,
            Level::DEBUG,
            Level::TRACE,
        ];
        for (index, &expected) in levels.iter().enumerate() {
            temp_env::with_vars([("CONTAS_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["contas".to_string(), "--dsn".to_string(), "p".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }
                let matches = commands::new().get_matches_from(args);
                assert_eq!(level_from(&matches), expected);
            });
        }
    }

    #[test]
    fn test_level_from_env_overrides_flags() {
        temp_env::with_vars([("CONTAS_LOG_LEVEL", Some("info"))], || {
            let matches =
                commands::new().get_matches_from(vec!["contas", "--dsn", "p", "-vvvv"]);
            assert_eq!(level_from(&matches), Level::INFO);
        });
    }

    #[test]
    fn test_level_from_env_names() {
        let levels = [
            ("error", Level::ERROR),
            ("warn", Level::WARN),
            ("info", Level::INFO),
            ("debug", Level::DEBUG),
            ("trace", Level::TRACE),
        ];
        for (name, expected) in levels {
            temp_env::with_vars([("CONTAS_LOG_LEVEL", Some(name))], || {
                let matches = commands::new().get_matches_from(vec!["contas", "--dsn", "p"]);
                assert_eq!(level_from(&matches), expected);
            });
        }
    }

    #[test]
    fn test_level_from_ignores_unknown_env_value() {
        temp_env::with_vars([("CONTAS_LOG_LEVEL", Some("verbose"))], || {
            let matches = commands::new().get_matches_from(vec!["contas", "--dsn", "p", "-vv"]);
            assert_eq!(level_from(&matches), Level::INFO);
        });
    }
}
