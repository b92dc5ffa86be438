//! Calendar-day keys for the entry store.
//!
//! A `DateKey` names one calendar day as `YYYY-MM-DD` (Gregorian calendar).
//! Instants are mapped to a day in the device's local timezone, so every
//! instant on the same local day yields the same key. The zone is read at the
//! moment of computation and is not recorded; an instant near midnight can map
//! to a different key after the device timezone changes.

use crate::constants::{DATE_FORMAT_COMPACT, DATE_FORMAT_ISO};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identifier of a calendar day.
///
/// # Examples
///
/// ```
/// use kansha::DateKey;
/// use chrono::NaiveDate;
///
/// let key = DateKey::from_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
/// assert_eq!(key.as_str(), "2024-03-01");
/// assert_eq!(DateKey::parse("20240301").unwrap(), key);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
    date: NaiveDate,
    text: String,
}

impl DateKey {
    /// Key for a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        DateKey {
            date,
            text: date.format(DATE_FORMAT_ISO).to_string(),
        }
    }

    /// Key for the local calendar day containing `instant`.
    ///
    /// Pure: depends only on the instant and the device's current timezone.
    pub fn key_for<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::key_in_zone(instant, &Local)
    }

    /// Key for the calendar day containing `instant` as observed in `zone`.
    pub fn key_in_zone<Tz: TimeZone, Z: TimeZone>(instant: &DateTime<Tz>, zone: &Z) -> Self {
        Self::from_date(instant.with_timezone(zone).date_naive())
    }

    /// Key for the current local day.
    pub fn today() -> Self {
        Self::key_for(&Local::now())
    }

    /// Parses `YYYY-MM-DD` or the compact `YYYYMMDD` form.
    pub fn parse(input: &str) -> Result<Self, chrono::ParseError> {
        let input = input.trim();
        NaiveDate::parse_from_str(input, DATE_FORMAT_ISO)
            .or_else(|_| NaiveDate::parse_from_str(input, DATE_FORMAT_COMPACT))
            .map(Self::from_date)
    }

    /// The calendar date this key names.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The key text, `YYYY-MM-DD`.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey::from_date(date)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&text, DATE_FORMAT_ISO)
            .map(DateKey::from_date)
            .map_err(|e| de::Error::custom(format!("invalid date key '{}': {}", text, e)))
    }
}

/// Anything that names a calendar day for the entry store.
pub trait ToDateKey {
    fn to_date_key(&self) -> DateKey;
}

impl ToDateKey for DateKey {
    fn to_date_key(&self) -> DateKey {
        self.clone()
    }
}

impl ToDateKey for NaiveDate {
    fn to_date_key(&self) -> DateKey {
        DateKey::from_date(*self)
    }
}

impl<Tz: TimeZone> ToDateKey for DateTime<Tz> {
    fn to_date_key(&self) -> DateKey {
        DateKey::key_for(self)
    }
}

impl<T: ToDateKey + ?Sized> ToDateKey for &T {
    fn to_date_key(&self) -> DateKey {
        (**self).to_date_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone, Utc};

    fn tokyo() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn test_from_date_formats_zero_padded() {
        let key = DateKey::from_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(key.as_str(), "2024-03-01");
        assert_eq!(key.to_string(), "2024-03-01");
    }

    #[test]
    fn test_same_local_day_same_key() {
        let zone = tokyo();
        let morning = zone.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let night = zone.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap();

        assert_eq!(
            DateKey::key_in_zone(&morning, &zone),
            DateKey::key_in_zone(&night, &zone)
        );
        assert_eq!(DateKey::key_in_zone(&night, &zone).as_str(), "2024-03-01");
    }

    #[test]
    fn test_every_hour_of_a_day_maps_to_one_key() {
        let zone = tokyo();
        let start = zone.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
        let expected = DateKey::key_in_zone(&start, &zone);

        for minutes in (0..24 * 60).step_by(17) {
            let instant = start + Duration::minutes(minutes);
            assert_eq!(DateKey::key_in_zone(&instant, &zone), expected);
        }
    }

    #[test]
    fn test_key_depends_on_observing_zone() {
        // 20:00 UTC on Feb 29 is already Mar 1 in Tokyo.
        let instant = Utc.with_ymd_and_hms(2024, 2, 29, 20, 0, 0).unwrap();

        assert_eq!(DateKey::key_in_zone(&instant, &Utc).as_str(), "2024-02-29");
        assert_eq!(DateKey::key_in_zone(&instant, &tokyo()).as_str(), "2024-03-01");
    }

    #[test]
    fn test_key_for_uses_local_zone() {
        let now = Local::now();
        assert_eq!(DateKey::key_for(&now).date(), now.date_naive());
        assert_eq!(DateKey::key_for(&now.with_timezone(&Utc)).date(), now.date_naive());
    }

    #[test]
    fn test_parse_accepts_iso_and_compact() {
        let iso = DateKey::parse("2023-01-15").unwrap();
        let compact = DateKey::parse("20230115").unwrap();
        assert_eq!(iso, compact);
        assert_eq!(iso.date(), NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DateKey::parse("invalid-date").is_err());
        assert!(DateKey::parse("2023-02-30").is_err());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let key = DateKey::parse("2024-03-02").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-03-02\"");
        let back: DateKey = serde_json::from_str("\"2024-03-02\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<DateKey>("\"yesterday\"").is_err());
    }

    #[test]
    fn test_keys_order_chronologically() {
        let a = DateKey::parse("2023-12-31").unwrap();
        let b = DateKey::parse("2024-01-01").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_to_date_key_impls_agree() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let key = DateKey::from_date(date);
        assert_eq!(date.to_date_key(), key);
        assert_eq!(key.to_date_key(), key);
        assert_eq!((&date).to_date_key(), key);
    }
}
