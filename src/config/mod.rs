//! Configuration management for the kansha application.
//!
//! This module handles loading and validating configuration settings from
//! environment variables, with sensible defaults. Configuration covers where
//! kansha keeps its data, where to find language files, and how logs are
//! formatted. User-facing preferences (theme, accent, language, reminder)
//! are not configuration; they live in [`Settings`](crate::settings::Settings).
//!
//! # Environment Variables
//!
//! - `KANSHA_DIR`: Path to the data directory (defaults to `~/.kansha`)
//! - `KANSHA_LANG_DIR`: Directory of `<code>.json` language files (defaults to the bundled set)
//! - `KANSHA_LOG_FORMAT`: `text` or `json` (defaults to `text`)
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DEFAULT_DATA_SUBDIR, ENV_VAR_HOME, ENV_VAR_KANSHA_DIR, ENV_VAR_KANSHA_LANG_DIR,
    ENV_VAR_KANSHA_LOG_FORMAT, LOG_FORMAT_JSON, LOG_FORMAT_TEXT,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            LOG_FORMAT_TEXT => Ok(LogFormat::Text),
            LOG_FORMAT_JSON => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "Unknown log format '{}'. Expected '{}' or '{}'",
                other, LOG_FORMAT_TEXT, LOG_FORMAT_JSON
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str(LOG_FORMAT_TEXT),
            LogFormat::Json => f.write_str(LOG_FORMAT_JSON),
        }
    }
}

/// Configuration for the kansha application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use kansha::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/path/to/kansha"),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory where the preference document (and with it every entry) is stored.
    pub data_dir: PathBuf,

    /// Optional directory of language files overriding the bundled ones.
    pub lang_dir: Option<PathBuf>,

    /// Format of log output.
    pub log_format: LogFormat,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &"[REDACTED_PATH]")
            .field("lang_dir", &self.lang_dir.as_ref().map(|_| "[REDACTED_PATH]"))
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            lang_dir: None,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// Paths are expanded with `shellexpand`, so `~` and `$VAR` references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - A path expansion fails
    /// - The data directory path is empty
    /// - `KANSHA_LOG_FORMAT` holds an unknown format
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kansha::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Data lives in {}", config.data_dir.display()),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(ENV_VAR_KANSHA_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });
        let data_dir = expand_path(&data_dir_str)?;

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let lang_dir = match env::var(ENV_VAR_KANSHA_LANG_DIR) {
            Ok(dir) if !dir.trim().is_empty() => Some(expand_path(&dir)?),
            _ => None,
        };

        let log_format = match env::var(ENV_VAR_KANSHA_LOG_FORMAT) {
            Ok(format) => format.parse()?,
            Err(_) => LogFormat::default(),
        };

        Ok(Config {
            data_dir,
            lang_dir,
            log_format,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Data directory path is empty"
    /// - "Data directory must be an absolute path"
    /// - "Language directory must be an absolute path"
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        if let Some(lang_dir) = &self.lang_dir {
            if !lang_dir.is_absolute() {
                return Err(AppError::Config(
                    "Language directory must be an absolute path".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn expand_path(raw: &str) -> AppResult<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Ensures the data directory exists, creating it if necessary.
///
/// New directories get owner-only permissions (0o700) on unix.
///
/// # Errors
///
/// Returns:
/// - `AppError::Config` if the provided path is not an absolute path
/// - `AppError::Io` if the directory creation fails
pub fn ensure_data_directory_exists(data_dir: &Path) -> AppResult<()> {
    if !data_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Data directory path must be absolute: {}",
            data_dir.display()
        )));
    }

    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;

        #[cfg(unix)]
        {
            let permissions =
                fs::Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(data_dir, permissions).map_err(|e| {
                AppError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to set secure permissions on data directory: {}", e),
                ))
            })?;
            debug!("Set 0o700 permissions on data directory");
        }
    }
    Ok(())
}
