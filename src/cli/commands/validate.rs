//! `validate` command handler

use crate::cli::args::ValidateArgs;
use crate::config::ConfigLoader;
use crate::error::{ConfigError, Severity, TabataError, ValidationIssue};

/// Validate workout files without running them.
///
/// Stops at the first invalid file.
///
/// # Errors
///
/// Returns a config error if a file is missing or invalid, or (with
/// `--strict`) produced warnings.
pub fn run(args: &ValidateArgs, quiet: bool) -> Result<(), TabataError> {
    let loader = ConfigLoader::with_defaults();

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");
        let result = loader.load(path)?;

        for warning in &result.warnings {
            tracing::warn!(
                location = warning.location.as_deref().unwrap_or("<unknown>"),
                "{}",
                warning.message
            );
        }

        if args.strict && !result.warnings.is_empty() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: result
                    .warnings
                    .into_iter()
                    .map(|w| ValidationIssue {
                        path: w.location.unwrap_or_default(),
                        message: w.message,
                        severity: Severity::Error,
                    })
                    .collect(),
            }
            .into());
        }

        if !quiet {
            println!("{}: ok", path.display());
        }
    }

    Ok(())
}
