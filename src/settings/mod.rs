//! User preferences: profile, display and reminder settings.
//!
//! `Settings` is passed explicitly to whatever needs a preference, instead of
//! each consumer reading shared storage on its own. Reads never fail: a value
//! that is missing, unreadable or of the wrong type falls back to its default
//! (with a warning for the latter two). Writes report storage errors.

use crate::constants::{
    DEFAULT_LANGUAGE, DEFAULT_REMINDER_HOUR, DEFAULT_REMINDER_MINUTE, PREF_ACCENT, PREF_DARK_MODE,
    PREF_LANGUAGE, PREF_REMINDER_ENABLED, PREF_REMINDER_HOUR, PREF_REMINDER_MINUTE,
    PREF_USERNAME,
};
use crate::errors::{AppError, StorageResult};
use crate::storage::{PrefValue, PreferenceStorage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

/// Accent color used to highlight headings and markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accent {
    Blue,
    Green,
    Orange,
    #[default]
    Purple,
    Red,
    Gray,
    Black,
}

impl Accent {
    /// Every accent, in picker order.
    pub const ALL: [Accent; 7] = [
        Accent::Blue,
        Accent::Green,
        Accent::Orange,
        Accent::Purple,
        Accent::Red,
        Accent::Gray,
        Accent::Black,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Accent::Blue => "blue",
            Accent::Green => "green",
            Accent::Orange => "orange",
            Accent::Purple => "purple",
            Accent::Red => "red",
            Accent::Gray => "gray",
            Accent::Black => "black",
        }
    }

    /// The accent as 8-bit RGB.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Accent::Blue => (0, 122, 255),
            Accent::Green => (51, 199, 89),
            Accent::Orange => (255, 148, 0),
            Accent::Purple => (176, 82, 222),
            Accent::Red => (255, 59, 48),
            Accent::Gray => (143, 143, 148),
            Accent::Black => (28, 28, 31),
        }
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Accent {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Accent::ALL
            .into_iter()
            .find(|accent| accent.name() == wanted)
            .ok_or_else(|| {
                AppError::Config(format!(
                    "Unknown accent '{}'. Choose one of: {}",
                    s,
                    Accent::ALL.map(Accent::name).join(", ")
                ))
            })
    }
}

/// Time of day for the daily reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTime {
    hour: u32,
    minute: u32,
}

impl ReminderTime {
    /// Returns `None` unless `hour < 24` and `minute < 60`.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(ReminderTime { hour, minute })
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }
}

impl Default for ReminderTime {
    fn default() -> Self {
        ReminderTime {
            hour: DEFAULT_REMINDER_HOUR,
            minute: DEFAULT_REMINDER_MINUTE,
        }
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ReminderTime {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::Config(format!("Invalid reminder time '{}'. Use HH:MM", s));
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = hour.parse().map_err(|_| invalid())?;
        let minute = minute.parse().map_err(|_| invalid())?;
        ReminderTime::new(hour, minute).ok_or_else(invalid)
    }
}

/// Whether the daily reminder is on, and when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub time: ReminderTime,
}

/// Read/write access to user preferences.
#[derive(Debug, Clone)]
pub struct Settings<S: PreferenceStorage> {
    storage: S,
}

impl<S: PreferenceStorage> Settings<S> {
    pub fn new(storage: S) -> Self {
        Settings { storage }
    }

    /// Display name; empty when never set.
    pub fn username(&self) -> String {
        self.read(PREF_USERNAME, self.storage.get_string(PREF_USERNAME))
            .unwrap_or_default()
    }

    pub fn set_username(&self, name: &str) -> StorageResult<()> {
        self.storage
            .set(PREF_USERNAME, PrefValue::Text(name.trim().to_string()))
    }

    pub fn theme(&self) -> Theme {
        match self.read(PREF_DARK_MODE, self.storage.get_bool(PREF_DARK_MODE)) {
            Some(true) => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn set_theme(&self, theme: Theme) -> StorageResult<()> {
        self.storage
            .set(PREF_DARK_MODE, PrefValue::Bool(theme.is_dark()))
    }

    /// The accent color; unknown stored names fall back to purple.
    pub fn accent(&self) -> Accent {
        self.read(PREF_ACCENT, self.storage.get_string(PREF_ACCENT))
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_accent(&self, accent: Accent) -> StorageResult<()> {
        self.storage.set(PREF_ACCENT, PrefValue::from(accent.name()))
    }

    /// Interface language code.
    pub fn language(&self) -> String {
        self.read(PREF_LANGUAGE, self.storage.get_string(PREF_LANGUAGE))
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    pub fn set_language(&self, code: &str) -> StorageResult<()> {
        self.storage.set(PREF_LANGUAGE, PrefValue::from(code))
    }

    /// Reminder switch and time; an out-of-range stored time reverts to 21:00.
    pub fn reminder(&self) -> ReminderSettings {
        let enabled = self
            .read(PREF_REMINDER_ENABLED, self.storage.get_bool(PREF_REMINDER_ENABLED))
            .unwrap_or(false);
        let hour = self.read(PREF_REMINDER_HOUR, self.storage.get_int(PREF_REMINDER_HOUR));
        let minute = self.read(PREF_REMINDER_MINUTE, self.storage.get_int(PREF_REMINDER_MINUTE));

        let time = match (hour, minute) {
            (None, None) => ReminderTime::default(),
            (hour, minute) => {
                let hour = hour.unwrap_or(i64::from(DEFAULT_REMINDER_HOUR));
                let minute = minute.unwrap_or(i64::from(DEFAULT_REMINDER_MINUTE));
                u32::try_from(hour)
                    .ok()
                    .zip(u32::try_from(minute).ok())
                    .and_then(|(h, m)| ReminderTime::new(h, m))
                    .unwrap_or_else(|| {
                        warn!(hour, minute, "Stored reminder time out of range, using default");
                        ReminderTime::default()
                    })
            }
        };

        ReminderSettings { enabled, time }
    }

    pub fn set_reminder(&self, reminder: ReminderSettings) -> StorageResult<()> {
        self.storage
            .set(PREF_REMINDER_ENABLED, PrefValue::Bool(reminder.enabled))?;
        self.storage.set(
            PREF_REMINDER_HOUR,
            PrefValue::Int(i64::from(reminder.time.hour())),
        )?;
        self.storage.set(
            PREF_REMINDER_MINUTE,
            PrefValue::Int(i64::from(reminder.time.minute())),
        )
    }

    fn read<T>(&self, key: &str, result: StorageResult<Option<T>>) -> Option<T> {
        result.unwrap_or_else(|e| {
            warn!(key, error = %e, "Ignoring unreadable preference");
            None
        })
    }
}
