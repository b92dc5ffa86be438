//! Month overview of recorded days.

use crate::constants::{DATE_FORMAT_ISO, MONTH_HEADING_FORMAT};
use crate::entry::{DateKey, Entry};
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

const WEEKDAY_HEADER: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
const RECORDED_MARK: char = '*';

/// One day in a [`MonthView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Whether a non-blank entry exists for the day.
    pub recorded: bool,
}

/// Every day of one month, flagged by whether anything was written.
///
/// # Examples
///
/// ```
/// use kansha::calendar::MonthView;
/// use kansha::store::EntryMap;
/// use kansha::{DateKey, Entry};
///
/// let mut entries = EntryMap::new();
/// entries.insert(
///     DateKey::parse("2024-03-02").unwrap(),
///     Entry::from_input(["Sunshine"]).unwrap(),
/// );
///
/// let view = MonthView::build(2024, 3, &entries).unwrap();
/// assert_eq!(view.days().len(), 31);
/// assert_eq!(view.recorded_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    first: NaiveDate,
    days: Vec<CalendarDay>,
}

impl MonthView {
    /// Builds the view for `year`/`month` from saved entries.
    ///
    /// Entries outside the month are ignored. Returns `None` when `month` is
    /// not in `1..=12` or the year is out of range.
    pub fn build<'a, I>(year: i32, month: u32, entries: I) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a DateKey, &'a Entry)>,
    {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let mut days: Vec<CalendarDay> = (0..31)
            .map(|offset| first + Duration::days(offset))
            .take_while(|date| date.month() == month)
            .map(|date| CalendarDay {
                date,
                recorded: false,
            })
            .collect();

        for (key, entry) in entries {
            let date = key.date();
            if date.year() == year && date.month() == month && !entry.is_blank() {
                days[date.day0() as usize].recorded = true;
            }
        }

        Some(MonthView { first, days })
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    /// Number of days with a non-blank entry.
    pub fn recorded_count(&self) -> usize {
        self.days.iter().filter(|day| day.recorded).count()
    }

    /// The first and last day of the month.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        let last = self.days.last().map(|day| day.date).unwrap_or(self.first);
        (self.first, last)
    }

    /// Month heading such as "March 2024".
    pub fn heading(&self) -> String {
        self.first.format(MONTH_HEADING_FORMAT).to_string()
    }
}

impl fmt::Display for MonthView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading())?;
        writeln!(f, "{}", WEEKDAY_HEADER.join(" "))?;

        let leading = self.first.weekday().num_days_from_monday() as usize;
        let mut row = "   ".repeat(leading);
        for (index, day) in self.days.iter().enumerate() {
            let mark = if day.recorded { RECORDED_MARK } else { ' ' };
            row.push_str(&format!("{:>2}{}", day.date.day(), mark));

            let column = (leading + index) % 7;
            if column == 6 || index + 1 == self.days.len() {
                writeln!(f, "{}", row.trim_end())?;
                row.clear();
            }
        }
        Ok(())
    }
}

/// Parses a `YYYY-MM` month argument.
///
/// # Errors
///
/// Returns `AppError::Journal` when the input is not a valid month.
pub fn parse_month(input: &str) -> AppResult<(i32, u32)> {
    let first = format!("{}-01", input.trim());
    NaiveDate::parse_from_str(&first, DATE_FORMAT_ISO)
        .map(|date| (date.year(), date.month()))
        .map_err(|_| AppError::Journal(format!("Invalid month '{}'. Use YYYY-MM", input)))
}
