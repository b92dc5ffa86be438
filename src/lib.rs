/*!
# Kansha

Kansha is a small gratitude journal: every day you write down up to three
things you are grateful for, and can look back at any past day or at a month
overview.

## Core Model

- [`DateKey`]: a calendar day in the local time zone, written `YYYY-MM-DD`
- [`Entry`]: exactly three lines of text for one day
- [`EntryStore`]: the day-to-entry mapping, persisted as one JSON blob in
  preference storage and rewritten on every change

## Architecture

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure
- `entry`, `store`: the journal itself
- `storage`: key-value preference backends (file and in-memory)
- `settings`, `locale`, `reminder`, `calendar`: everything around it
- `app`: command handlers tying the pieces together

## Usage Example

```rust
use kansha::storage::MemoryPreferences;
use kansha::{DateKey, Entry, EntryStore};

let mut store = EntryStore::open(MemoryPreferences::new());
let today = DateKey::today();

store.set(&today, Entry::from_input(["Family", "Health", "Coffee"])?);
assert_eq!(store.get(&today).line(0), Some("Family"));
# Ok::<(), kansha::AppError>(())
```
*/

/// Command handlers used by the binary
pub mod app;
/// Month overview of recorded days
pub mod calendar;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Gratitude entries and their day keys
pub mod entry;
/// Error types and utilities for error handling
pub mod errors;
/// Localized interface strings
pub mod locale;
/// Daily reminder scheduling
pub mod reminder;
/// User preferences
pub mod settings;
/// Preference storage backends
pub mod storage;
/// The per-day entry store
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use entry::{DateKey, Entry};
pub use errors::{AppError, AppResult};
pub use store::EntryStore;
