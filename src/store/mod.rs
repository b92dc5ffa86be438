//! The per-day entry store.
//!
//! `EntryStore` owns the mapping from calendar day to [`Entry`] for the
//! running session. It hydrates itself once from the persisted blob when
//! opened, and every `set` / `clear_all` rewrites the entire blob
//! synchronously before returning.
//!
//! Persistence failures never reach the caller. A blob that cannot be read
//! or decoded is discarded and the store starts empty; a write the storage
//! rejects is logged and the in-memory mapping stays authoritative. Because
//! each write serializes the whole mapping, the next successful write also
//! carries any change an earlier failed write lost.

pub mod codec;

pub use codec::{decode_entries, encode_entries, EntryMap};

use crate::constants::STORE_BLOB_KEY;
use crate::entry::{DateKey, Entry, ToDateKey};
use crate::storage::{PrefValue, PreferenceStorage};
use chrono::NaiveDate;
use std::fmt;
use tracing::{debug, error, info, warn};

/// How the store's initial contents were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// No blob was stored; started empty.
    Empty,
    /// The blob was decoded successfully.
    Restored { entries: usize },
    /// A blob existed but could not be read or decoded; started empty.
    Reset,
}

/// A change to the store, delivered to subscribers after it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The entry for this day was replaced.
    Saved(DateKey),
    /// Every entry was removed.
    Cleared,
}

/// Handle returned by [`EntryStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Mapping from calendar day to gratitude entry, synchronized to one blob.
///
/// # Examples
///
/// ```
/// use kansha::storage::MemoryPreferences;
/// use kansha::{Entry, EntryStore};
/// use chrono::NaiveDate;
///
/// let prefs = MemoryPreferences::new();
/// let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
///
/// let mut store = EntryStore::open(prefs.clone());
/// store.set(day, Entry::from_input(["Family", "Health", "Coffee"]).unwrap());
///
/// // A fresh store over the same storage sees the saved entry.
/// let reopened = EntryStore::open(prefs);
/// assert_eq!(reopened.get(day).line(2), Some("Coffee"));
/// ```
pub struct EntryStore<S: PreferenceStorage> {
    storage: S,
    entries: EntryMap,
    hydration: Hydration,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: PreferenceStorage> fmt::Debug for EntryStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryStore")
            .field("entries", &self.entries.len())
            .field("hydration", &self.hydration)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: PreferenceStorage> EntryStore<S> {
    /// Opens the store, hydrating it from the persisted blob.
    ///
    /// Never fails: an absent blob yields an empty store, and an unreadable
    /// or undecodable one is logged and replaced by an empty store.
    pub fn open(storage: S) -> Self {
        let (entries, hydration) = match storage.get_string(STORE_BLOB_KEY) {
            Ok(None) => {
                debug!("No entry store blob found, starting empty");
                (EntryMap::new(), Hydration::Empty)
            }
            Ok(Some(blob)) => match decode_entries(&blob) {
                Ok(entries) => {
                    let count = entries.len();
                    info!(entries = count, "Entry store restored");
                    (entries, Hydration::Restored { entries: count })
                }
                Err(e) => {
                    warn!(error = %e, "Discarding undecodable entry store blob");
                    (EntryMap::new(), Hydration::Reset)
                }
            },
            Err(e) => {
                warn!(error = %e, "Failed to read entry store blob, starting empty");
                (EntryMap::new(), Hydration::Reset)
            }
        };

        EntryStore {
            storage,
            entries,
            hydration,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// How the initial contents were obtained.
    pub fn hydration(&self) -> Hydration {
        self.hydration
    }

    /// The entry for a day, or the default (three empty lines) if none was saved.
    pub fn get(&self, date: impl ToDateKey) -> Entry {
        self.entries
            .get(&date.to_date_key())
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the entry for a day and persists the whole mapping.
    pub fn set(&mut self, date: impl ToDateKey, entry: Entry) {
        let key = date.to_date_key();
        debug!(date = %key, "Saving entry");
        self.entries.insert(key.clone(), entry);
        self.persist();
        self.notify(&StoreEvent::Saved(key));
    }

    /// Removes every entry and erases the persisted blob.
    pub fn clear_all(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        match self.storage.remove(STORE_BLOB_KEY) {
            Ok(()) => info!(removed, "Entry store cleared"),
            Err(e) => error!(error = %e, "Failed to erase entry store blob"),
        }
        self.notify(&StoreEvent::Cleared);
    }

    /// Registers a listener called after every `set` and `clear_all`.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// An immutable copy of the whole mapping.
    pub fn snapshot(&self) -> EntryMap {
        self.entries.clone()
    }

    /// Saved entries for the days `from..=to`, in date order.
    pub fn entries_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = (&DateKey, &Entry)> + '_ {
        let range = if from <= to {
            Some(DateKey::from_date(from)..=DateKey::from_date(to))
        } else {
            None
        };
        range
            .into_iter()
            .flat_map(move |range| self.entries.range(range))
    }

    /// Number of saved days.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        let blob = match encode_entries(&self.entries) {
            Ok(blob) => blob,
            Err(e) => {
                error!(error = %e, "Failed to encode entry store");
                return;
            }
        };
        match self.storage.set(STORE_BLOB_KEY, PrefValue::Text(blob)) {
            Ok(()) => debug!(entries = self.entries.len(), "Entry store persisted"),
            Err(e) => error!(error = %e, "Failed to persist entry store"),
        }
    }

    fn notify(&mut self, event: &StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}
