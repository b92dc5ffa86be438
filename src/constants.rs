//! Constants used throughout the application.
//!
//! This module contains all constants used in kansha, organized into logical
//! groups. Preference keys live here so the store, the settings object and the
//! reminder service agree on the persisted layout.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "kansha";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A small gratitude journal: three things, every day";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
/// Log filter used with `--verbose`.
pub const VERBOSE_LOG_LEVEL: &str = "debug";

// Configuration Keys & Environment Variables
/// Environment variable for the kansha data directory.
pub const ENV_VAR_KANSHA_DIR: &str = "KANSHA_DIR";
/// Environment variable for a directory of language files overriding the bundled ones.
pub const ENV_VAR_KANSHA_LANG_DIR: &str = "KANSHA_LANG_DIR";
/// Environment variable selecting the log format (`text` or `json`).
pub const ENV_VAR_KANSHA_LOG_FORMAT: &str = "KANSHA_LOG_FORMAT";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Standard environment variable disabling colored output.
pub const ENV_VAR_NO_COLOR: &str = "NO_COLOR";
/// Default sub-directory for kansha data within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".kansha";

// File System Parameters
/// File name of the preference document inside the data directory.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";
/// File name of the advisory lock guarding the preference document.
pub const PREFERENCES_LOCK_FILE_NAME: &str = "preferences.lock";
/// Where an undecodable preference document is moved before it is replaced.
pub const PREFERENCES_CORRUPT_FILE_NAME: &str = "preferences.json.corrupt";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Preference Keys
/// Key of the serialized entry store blob.
pub const STORE_BLOB_KEY: &str = "KanshaGratitudeStore.v1";
pub const PREF_USERNAME: &str = "kansha.username";
pub const PREF_DARK_MODE: &str = "kansha.darkMode";
pub const PREF_ACCENT: &str = "kansha.accent";
pub const PREF_LANGUAGE: &str = "kansha.language";
pub const PREF_REMINDER_ENABLED: &str = "kansha.reminderEnabled";
pub const PREF_REMINDER_HOUR: &str = "kansha.reminderHour";
pub const PREF_REMINDER_MINUTE: &str = "kansha.reminderMinute";
/// Key under which pending notification requests are recorded.
pub const PREF_PENDING_NOTIFICATIONS: &str = "kansha.pendingNotifications";

// Defaults
/// Default interface language.
pub const DEFAULT_LANGUAGE: &str = "en";
/// Default reminder hour (evening).
pub const DEFAULT_REMINDER_HOUR: u32 = 21;
/// Default reminder minute.
pub const DEFAULT_REMINDER_MINUTE: u32 = 0;
/// Identifier of the single repeating daily reminder.
pub const DAILY_REMINDER_ID: &str = "kansha.dailyReminder";
/// Strings used when a language file cannot be loaded.
pub const LANGUAGE_FALLBACK_KEY: &str = "error";
pub const LANGUAGE_FALLBACK_MESSAGE: &str = "Language file not found";

// Date/Time Logic
/// Number of gratitude lines recorded per day.
pub const LINES_PER_ENTRY: usize = 3;
/// Date format string for ISO date format (YYYY-MM-DD). Also the store key format.
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Format used when showing a single day's entry.
pub const DATE_FORMAT_FULL: &str = "%A, %B %-d, %Y";
/// Format used for the month heading of the calendar.
pub const MONTH_HEADING_FORMAT: &str = "%B %Y";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "kansha";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
