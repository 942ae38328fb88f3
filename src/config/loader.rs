//! Configuration loader
//!
//! Loading pipeline:
//! 1. Size check and raw read (UTF-8 BOM stripped)
//! 2. YAML parsing into the typed config
//! 3. Validation (all issues collected)
//! 4. Freeze with `Arc`

use std::path::Path;
use std::sync::Arc;

use crate::config::schema::TabataConfig;
use crate::config::validation::{ValidationResult, Validator};
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_config_size: env_or("TABATA_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: Arc<TabataConfig>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads a configuration file and returns the frozen configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > self.options.max_config_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {} bytes", self.options.max_config_size),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::MissingFile {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::InvalidData => ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "file is not valid UTF-8".to_string(),
            },
            _ => ConfigError::Unreadable {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        self.load_str(&raw, path)
    }

    /// Parses and validates configuration text.
    ///
    /// `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed YAML and
    /// `ConfigError::ValidationError` if any value is out of bounds.
    pub fn load_str(&self, content: &str, origin: &Path) -> Result<LoadResult, ConfigError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        // An empty file is the default workout, not a parse error.
        let config: TabataConfig = if content.trim().is_empty() {
            TabataConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                path: origin.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?
        };

        let warnings = check(&config, &origin.display().to_string())?;

        Ok(LoadResult {
            config: Arc::new(config),
            warnings,
        })
    }
}

/// Validates a configuration built outside the loader (e.g. from CLI flags).
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` carrying every error found.
pub fn check(config: &TabataConfig, origin: &str) -> Result<Vec<LoadWarning>, ConfigError> {
    let result = Validator::new().validate(config);
    into_warnings(result, origin)
}

fn into_warnings(result: ValidationResult, origin: &str) -> Result<Vec<LoadWarning>, ConfigError> {
    if result.has_errors() {
        return Err(ConfigError::ValidationError {
            path: origin.to_string(),
            errors: result.errors,
        });
    }
    Ok(result
        .warnings
        .into_iter()
        .map(|w| LoadWarning {
            message: w.message,
            location: Some(w.path),
        })
        .collect())
}

/// Reads a numeric limit from the environment, falling back to `default`.
fn env_or(var: &str, default: usize) -> usize {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
