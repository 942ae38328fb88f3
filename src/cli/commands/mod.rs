//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod plan;
pub mod run;
pub mod validate;
pub mod version;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands, SettingsArgs};
use crate::config::{ConfigLoader, LoadWarning, TabataConfig, loader};
use crate::error::TabataError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), TabataError> {
    match cli.command {
        Commands::Run(args) => run::run(&args, cli.quiet, cancel).await,
        Commands::Plan(args) => plan::run(&args),
        Commands::Validate(args) => validate::run(&args, cli.quiet),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Builds the effective configuration: file (or defaults), then flag
/// overrides, then validation of the merged result.
///
/// # Errors
///
/// Returns a config error if the file cannot be loaded or the merged
/// configuration is invalid.
pub fn resolve_settings(args: &SettingsArgs) -> Result<TabataConfig, TabataError> {
    let (mut config, origin) = match &args.config {
        Some(path) => {
            tracing::info!(config = %path.display(), "loading configuration");
            let result = ConfigLoader::with_defaults().load(path)?;
            log_warnings(&result.warnings);
            (
                TabataConfig::clone(&result.config),
                path.display().to_string(),
            )
        }
        None => (TabataConfig::default(), "<defaults>".to_string()),
    };

    let before = config.clone();
    apply_overrides(&mut config, args);
    if config != before {
        let warnings = loader::check(&config, &format!("{origin} + flags"))?;
        log_warnings(&warnings);
    }
    Ok(config)
}

fn apply_overrides(config: &mut TabataConfig, args: &SettingsArgs) {
    let workout = &mut config.workout;
    if let Some(v) = args.work {
        workout.work = v;
    }
    if let Some(v) = args.rest {
        workout.rest = v;
    }
    if let Some(v) = args.rounds {
        workout.rounds = v;
    }
    if let Some(v) = args.circuits {
        workout.circuits = v;
    }
    if let Some(v) = args.between_circuits_rest {
        workout.between_circuits_rest = v;
    }
    if let Some(v) = &args.exercises {
        workout.exercises = Some(v.clone());
    }
    if let Some(v) = args.lead_in {
        config.lead_in = v;
    }
}

fn log_warnings(warnings: &[LoadWarning]) {
    for warning in warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_settings(&SettingsArgs::default()).unwrap();
        assert_eq!(config, TabataConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workout:\n  work: 40s\n  rounds: 5\nlead_in: 5").unwrap();

        let args = SettingsArgs {
            config: Some(file.path().to_path_buf()),
            rounds: Some(6),
            ..SettingsArgs::default()
        };
        let config = resolve_settings(&args).unwrap();
        assert_eq!(config.workout.work, 40);
        assert_eq!(config.workout.rounds, 6);
        assert_eq!(config.lead_in, 5);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = SettingsArgs {
            circuits: Some(0),
            ..SettingsArgs::default()
        };
        let err = resolve_settings(&args).unwrap_err();
        assert!(matches!(
            err,
            TabataError::Config(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let args = SettingsArgs {
            config: Some("/definitely/not/here.yaml".into()),
            ..SettingsArgs::default()
        };
        let err = resolve_settings(&args).unwrap_err();
        assert!(matches!(
            err,
            TabataError::Config(ConfigError::MissingFile { .. })
        ));
    }
}
