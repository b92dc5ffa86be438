//! The per-day gratitude entry.
//!
//! An `Entry` always holds exactly three lines, in display order. Absence from
//! the store is equivalent to `Entry::default()` (three empty lines), so there
//! is no separate "deleted" state.

pub mod date_key;

pub use date_key::{DateKey, ToDateKey};

use crate::constants::LINES_PER_ENTRY;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize};

/// The three gratitude lines recorded for one calendar day.
///
/// # Examples
///
/// ```
/// use kansha::Entry;
///
/// let entry = Entry::from_input(["  Family ", "Health"]).unwrap();
/// assert_eq!(entry.lines(), &["Family", "Health", ""]);
/// assert!(Entry::default().is_blank());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(deserialize_with = "deserialize_lines")]
    lines: [String; LINES_PER_ENTRY],
}

impl Entry {
    /// Builds an entry from exactly three lines, taken as-is.
    pub fn new(lines: [String; LINES_PER_ENTRY]) -> Self {
        Entry { lines }
    }

    /// Builds an entry from user input.
    ///
    /// Each line is trimmed of surrounding whitespace and missing lines are
    /// filled with empty strings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Journal` when more than three lines are given.
    pub fn from_input<I, S>(input: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines: [String; LINES_PER_ENTRY] = Default::default();
        for (index, line) in input.into_iter().enumerate() {
            if index >= LINES_PER_ENTRY {
                return Err(AppError::Journal(format!(
                    "An entry holds at most {} lines",
                    LINES_PER_ENTRY
                )));
            }
            lines[index] = line.as_ref().trim().to_string();
        }
        Ok(Entry { lines })
    }

    /// The three lines in display order.
    pub fn lines(&self) -> &[String; LINES_PER_ENTRY] {
        &self.lines
    }

    /// A single line, or `None` past the third.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// True when every line is empty.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.is_empty())
    }
}

/// Accepts a `lines` array of any length, padding or truncating it to three.
fn deserialize_lines<'de, D>(deserializer: D) -> Result<[String; LINES_PER_ENTRY], D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut lines: [String; LINES_PER_ENTRY] = Default::default();
    for (slot, line) in lines.iter_mut().zip(raw) {
        *slot = line;
    }
    Ok(lines)
}
