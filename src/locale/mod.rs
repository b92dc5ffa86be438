//! Localized interface strings.
//!
//! Each language is a flat `{ "key": "text" }` JSON file named `<code>.json`.
//! English, Vietnamese and Japanese are compiled in; a language directory can
//! be configured to override or extend them. Looking up a key that a file
//! does not define returns the key itself, so a missing translation shows up
//! as its key rather than as an empty string.

use crate::constants::{LANGUAGE_FALLBACK_KEY, LANGUAGE_FALLBACK_MESSAGE};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A selectable interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
}

/// Languages offered in the profile.
pub const AVAILABLE_LANGUAGES: [LanguageInfo; 3] = [
    LanguageInfo {
        code: "en",
        name: "English",
        native_name: "English",
    },
    LanguageInfo {
        code: "vi",
        name: "Vietnamese",
        native_name: "Tiếng Việt",
    },
    LanguageInfo {
        code: "ja",
        name: "Japanese",
        native_name: "日本語",
    },
];

/// Looks up a language by code.
pub fn language_info(code: &str) -> Option<&'static LanguageInfo> {
    AVAILABLE_LANGUAGES.iter().find(|info| info.code == code)
}

fn bundled(code: &str) -> Option<&'static str> {
    match code {
        "en" => Some(include_str!("../../languages/en.json")),
        "vi" => Some(include_str!("../../languages/vi.json")),
        "ja" => Some(include_str!("../../languages/ja.json")),
        _ => None,
    }
}

/// String table for one language.
///
/// # Examples
///
/// ```
/// use kansha::locale::Localizer;
///
/// let en = Localizer::load("en", None);
/// assert_eq!(en.localized("save"), "Save");
/// assert_eq!(en.localized("no_such_key"), "no_such_key");
/// ```
#[derive(Debug, Clone)]
pub struct Localizer {
    code: String,
    strings: HashMap<String, String>,
}

impl Localizer {
    /// Loads the strings for `code`.
    ///
    /// When `dir` is given, `<dir>/<code>.json` is read and the bundled table
    /// is only used if that file does not exist. A file that cannot be read or
    /// parsed, or an unknown code, leaves a single `error` entry in the table.
    pub fn load(code: &str, dir: Option<&Path>) -> Self {
        let strings = match Self::read_table(code, dir) {
            Some(strings) => strings,
            None => {
                warn!(code, "Language file not found or unreadable");
                HashMap::from([(
                    LANGUAGE_FALLBACK_KEY.to_string(),
                    LANGUAGE_FALLBACK_MESSAGE.to_string(),
                )])
            }
        };
        debug!(code, keys = strings.len(), "Language loaded");
        Localizer {
            code: code.to_string(),
            strings,
        }
    }

    fn read_table(code: &str, dir: Option<&Path>) -> Option<HashMap<String, String>> {
        if let Some(dir) = dir {
            let path = dir.join(format!("{}.json", code));
            if path.exists() {
                let content = fs::read_to_string(&path)
                    .map_err(|e| warn!(path = %path.display(), error = %e, "Failed to read language file"))
                    .ok()?;
                return Self::parse(&content);
            }
        }
        bundled(code).and_then(Self::parse)
    }

    fn parse(content: &str) -> Option<HashMap<String, String>> {
        serde_json::from_str(content)
            .map_err(|e| warn!(error = %e, "Failed to parse language file"))
            .ok()
    }

    /// The language code this table was loaded for.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The text for `key`, or `key` itself when the table has no entry.
    pub fn localized<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings.get(key).map(String::as_str).unwrap_or(key)
    }
}
