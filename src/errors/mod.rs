//! Error handling utilities for the kansha application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, the
//! storage-level `StorageError` used by preference backends, and the
//! convenience aliases `AppResult` and `StorageResult`.
//!
//! Note that the entry store itself never surfaces these errors to its
//! callers: it logs persistence failures and carries on with its in-memory
//! state. The types below are for everything around it.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents errors that can occur when attempting to lock the preference file.
///
/// # Examples
///
/// Creating a file busy error:
///
/// ```
/// use kansha::errors::LockError;
/// use std::path::PathBuf;
///
/// let error = LockError::FileBusy {
///     path: PathBuf::from("/path/to/preferences.lock"),
/// };
///
/// assert!(format!("{}", error).contains("locked by another process"));
/// ```
#[derive(Debug, Error)]
pub enum LockError {
    /// Error when the file is already locked by another process.
    #[error("Preference file is locked by another process: {path}. Please wait for the other kansha process to finish.")]
    FileBusy {
        /// The path to the lock file that is held
        path: PathBuf,
    },

    /// Error when acquiring the lock fails for a technical reason.
    #[error("Failed to acquire lock {path}: {source}. Please check file permissions and ensure the directory is accessible.")]
    AcquisitionFailed {
        /// The path to the lock file that couldn't be locked
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Errors raised by preference storage backends and the blob codec.
///
/// # Examples
///
/// ```
/// use kansha::errors::StorageError;
///
/// let error = StorageError::Rejected("disk full".to_string());
/// assert_eq!(format!("{}", error), "Storage rejected the write: disk full");
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure while reading or writing preferences.
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// A value could not be serialized.
    #[error("Failed to encode stored data: {0}")]
    Encode(#[source] serde_json::Error),

    /// Stored data could not be parsed back.
    #[error("Failed to decode stored data: {0}")]
    Decode(#[source] serde_json::Error),

    /// The preference file lock could not be taken.
    #[error("Storage lock error: {0}")]
    Lock(#[from] LockError),

    /// A stored value exists but has a different type than requested.
    #[error("Preference '{key}' is not a {expected}")]
    TypeMismatch {
        /// The preference key
        key: String,
        /// The type the caller asked for
        expected: &'static str,
    },

    /// The backend refused the write.
    #[error("Storage rejected the write: {0}")]
    Rejected(String),
}

/// Errors raised by notification schedulers.
#[derive(Debug, Error)]
pub enum ReminderError {
    /// The user (or platform) declined notification permission.
    #[error("Notification permission was not granted")]
    NotAuthorized,

    /// Recording the scheduled notification failed.
    #[error("Failed to record reminder: {0}")]
    Storage(#[from] StorageError),
}

/// Represents all possible errors that can occur in the kansha application.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use kansha::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
///
/// Converting from an IO error:
/// ```
/// use kansha::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors in journal input (invalid dates, too many lines, ...).
    #[error("Journal error: {0}")]
    Journal(String),

    /// Errors from preference storage outside the entry store.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Errors from reminder scheduling.
    #[error("Reminder error: {0}")]
    Reminder(#[from] ReminderError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use kansha::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Journal("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

/// A type alias for results of preference storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
