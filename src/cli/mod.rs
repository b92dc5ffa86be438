//! Command-line interface for kansha.
//!
//! This module defines the argument structure using clap's derive macros.
//! Running `kansha` with no subcommand behaves like `kansha today`.

use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::entry::DateKey;
use crate::errors::{AppError, AppResult};
use crate::settings::{Accent, ReminderTime};
use clap::{ArgAction, Parser, Subcommand};

/// Command-line arguments for kansha.
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION, version, long_about = None)]
pub struct CliArgs {
    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format (overrides KANSHA_LOG_FORMAT)
    #[arg(long, global = true, value_name = "FORMAT", value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show today's entry
    Today,

    /// Save up to three gratitude lines for a day
    Write {
        /// Day to write for (YYYY-MM-DD or YYYYMMDD); defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// One to three lines; missing lines are left empty
        #[arg(required = true, num_args = 1..=3, value_name = "LINE")]
        lines: Vec<String>,
    },

    /// Show the entry for a specific day
    Show {
        /// Day to show (YYYY-MM-DD or YYYYMMDD)
        #[arg(short, long)]
        date: String,
    },

    /// Show a month with recorded days marked
    Calendar {
        /// Month to show (YYYY-MM); defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Delete every entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// View or change profile and display preferences
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Manage the daily reminder
    Reminder {
        #[command(subcommand)]
        action: ReminderAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    /// Print current preferences
    Show,

    /// Change one or more preferences
    Set {
        /// Display name (empty to clear)
        #[arg(long)]
        name: Option<String>,

        /// Dark mode on or off
        #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
        dark_mode: Option<bool>,

        /// Accent color (blue, green, orange, purple, red, gray, black)
        #[arg(long)]
        accent: Option<Accent>,

        /// Interface language code (en, vi, ja)
        #[arg(long)]
        language: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ReminderAction {
    /// Turn the evening reminder on
    On {
        /// Reminder time (HH:MM); keeps the current time when omitted
        #[arg(long, value_name = "HH:MM")]
        at: Option<ReminderTime>,
    },
    /// Turn the reminder off
    Off,
    /// Show whether the reminder is on and when it fires next
    Status,
}

impl CliArgs {
    /// The subcommand to run, defaulting to `today`.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Today)
    }
}

/// Parses a `--date` value into a day key.
///
/// # Errors
///
/// Returns `AppError::Journal` when the value is neither `YYYY-MM-DD` nor
/// `YYYYMMDD`.
pub fn parse_date_arg(input: &str) -> AppResult<DateKey> {
    DateKey::parse(input)
        .map_err(|e| AppError::Journal(format!("Invalid date format '{}': {}", input, e)))
}
