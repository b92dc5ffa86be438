//! Command handlers.
//!
//! `App` wires one preference storage handle into the entry store, the
//! settings object, the localizer and the reminder scheduler, then runs a
//! single parsed [`Command`] against them. Output goes to any `Write` and
//! confirmation answers come from any `BufRead`, so the same code serves the
//! binary and the tests.

use crate::calendar::{parse_month, MonthView};
use crate::cli::{parse_date_arg, Command, ProfileAction, ReminderAction};
use crate::constants::{DAILY_REMINDER_ID, DATE_FORMAT_FULL};
use crate::entry::{DateKey, Entry};
use crate::errors::{AppError, AppResult};
use crate::locale::{language_info, Localizer};
use crate::reminder::{apply_reminder, next_fire_after, NotificationScheduler, PreferenceScheduler};
use crate::settings::{Accent, ReminderSettings, ReminderTime, Settings, Theme};
use crate::storage::PreferenceStorage;
use crate::store::{EntryStore, StoreEvent};
use chrono::{Datelike, Local};
use owo_colors::OwoColorize;
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Everything one invocation needs, built over a single storage handle.
#[derive(Debug)]
pub struct App<S: PreferenceStorage + Clone + 'static> {
    lang_dir: Option<PathBuf>,
    settings: Settings<S>,
    localizer: Localizer,
    scheduler: PreferenceScheduler<S>,
    store: EntryStore<S>,
    notices: Rc<RefCell<Vec<StoreEvent>>>,
    color: bool,
}

impl<S: PreferenceStorage + Clone + 'static> App<S> {
    /// Hydrates the store and loads the configured language.
    pub fn open(storage: S, lang_dir: Option<PathBuf>, color: bool) -> Self {
        let settings = Settings::new(storage.clone());
        let localizer = Localizer::load(&settings.language(), lang_dir.as_deref());
        let scheduler = PreferenceScheduler::new(storage.clone());
        let mut store = EntryStore::open(storage);

        let notices = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&notices);
        store.subscribe(move |event: &StoreEvent| sink.borrow_mut().push(event.clone()));

        App {
            lang_dir,
            settings,
            localizer,
            scheduler,
            store,
            notices,
            color,
        }
    }

    pub fn store(&self) -> &EntryStore<S> {
        &self.store
    }

    pub fn settings(&self) -> &Settings<S> {
        &self.settings
    }

    /// Runs one command.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Journal` for malformed dates or months,
    /// `AppError::Config` for invalid preference changes, `AppError::Storage`
    /// when a preference write fails and `AppError::Io` when output fails.
    /// Entry writes never fail: the store logs persistence problems itself.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        command: Command,
        input: &mut R,
        out: &mut W,
    ) -> AppResult<()> {
        debug!(?command, "Running command");
        match command {
            Command::Today => self.show_day(&DateKey::today(), true, out),
            Command::Write { date, lines } => self.write_entry(date.as_deref(), &lines, out),
            Command::Show { date } => {
                let key = parse_date_arg(&date)?;
                self.show_day(&key, false, out)
            }
            Command::Calendar { month } => self.calendar(month.as_deref(), out),
            Command::Clear { yes } => self.clear(yes, input, out),
            Command::Profile { action } => match action {
                ProfileAction::Show => self.profile_show(out),
                ProfileAction::Set {
                    name,
                    dark_mode,
                    accent,
                    language,
                } => self.profile_set(name, dark_mode, accent, language, out),
            },
            Command::Reminder { action } => match action {
                ReminderAction::On { at } => self.set_reminder_enabled(true, at, out),
                ReminderAction::Off => self.set_reminder_enabled(false, None, out),
                ReminderAction::Status => self.reminder_status(out),
            },
        }
    }

    fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.localizer.localized(key)
    }

    fn accent(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let (r, g, b) = self.settings.accent().rgb();
        text.truecolor(r, g, b).bold().to_string()
    }

    fn show_day<W: Write>(&self, key: &DateKey, is_today: bool, out: &mut W) -> AppResult<()> {
        let heading = key.date().format(DATE_FORMAT_FULL).to_string();
        if is_today {
            writeln!(out, "{}  {}", self.accent(self.text("today")), heading)?;
            writeln!(out, "{}", self.text("three_thanks_note"))?;
        } else {
            writeln!(out, "{}", self.accent(&heading))?;
        }

        let entry = self.store.get(key);
        if entry.is_blank() {
            writeln!(out, "{}", self.text("no_entry"))?;
            return Ok(());
        }
        for (index, line) in entry.lines().iter().enumerate() {
            let numbered = format!("{}. {}", index + 1, line);
            writeln!(out, "{}", numbered.trim_end())?;
        }
        Ok(())
    }

    fn write_entry<W: Write>(
        &mut self,
        date: Option<&str>,
        lines: &[String],
        out: &mut W,
    ) -> AppResult<()> {
        let key = match date {
            Some(date) => parse_date_arg(date)?,
            None => DateKey::today(),
        };
        let entry = Entry::from_input(lines)?;
        self.store.set(&key, entry);
        self.flush_notices(out)
    }

    fn calendar<W: Write>(&self, month: Option<&str>, out: &mut W) -> AppResult<()> {
        let (year, month) = match month {
            Some(month) => parse_month(month)?,
            None => {
                let today = Local::now().date_naive();
                (today.year(), today.month())
            }
        };
        let view = MonthView::build(year, month, &self.store.snapshot())
            .ok_or_else(|| AppError::Journal(format!("Invalid month {}-{:02}", year, month)))?;

        write!(out, "{}", view)?;

        let (first, last) = view.bounds();
        for (key, entry) in self.store.entries_between(first, last) {
            if entry.is_blank() {
                continue;
            }
            let summary: Vec<&str> = entry
                .lines()
                .iter()
                .map(String::as_str)
                .filter(|line| !line.is_empty())
                .collect();
            writeln!(out, "{}  {}", self.accent(key.as_str()), summary.join("; "))?;
        }
        Ok(())
    }

    fn clear<R: BufRead, W: Write>(&mut self, yes: bool, input: &mut R, out: &mut W) -> AppResult<()> {
        if !yes {
            write!(
                out,
                "{} {} [y/N] ",
                self.text("reset_confirm_title"),
                self.text("reset_confirm_message")
            )?;
            out.flush()?;

            let mut answer = String::new();
            input.read_line(&mut answer)?;
            if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                info!("Clear cancelled");
                writeln!(out, "{}", self.text("clear_cancelled"))?;
                return Ok(());
            }
        }

        self.store.clear_all();
        self.flush_notices(out)
    }

    fn profile_show<W: Write>(&self, out: &mut W) -> AppResult<()> {
        let name = self.settings.username();
        let theme = match self.settings.theme() {
            Theme::Dark => self.text("dark_mode"),
            Theme::Light => self.text("light_mode"),
        };
        let code = self.settings.language();
        let language = language_info(&code).map_or(code.as_str(), |info| info.native_name);
        let reminder = self.settings.reminder();
        let reminder_state = if reminder.enabled {
            self.text("reminder_on")
        } else {
            self.text("reminder_off")
        };

        writeln!(out, "{}", self.accent(self.text("profile")))?;
        writeln!(
            out,
            "{}: {}",
            self.text("name_optional"),
            if name.is_empty() { "-" } else { name.as_str() }
        )?;
        writeln!(out, "{}: {}", self.text("display"), theme)?;
        writeln!(out, "{}: {}", self.text("accent_color"), self.settings.accent())?;
        writeln!(out, "{}: {} ({})", self.text("language"), language, code)?;
        writeln!(
            out,
            "{}: {} {}",
            self.text("reminder"),
            reminder_state,
            reminder.time
        )?;
        writeln!(out, "{}", self.text("version"))?;
        Ok(())
    }

    fn profile_set<W: Write>(
        &mut self,
        name: Option<String>,
        dark_mode: Option<bool>,
        accent: Option<Accent>,
        language: Option<String>,
        out: &mut W,
    ) -> AppResult<()> {
        if name.is_none() && dark_mode.is_none() && accent.is_none() && language.is_none() {
            return Err(AppError::Config(
                "Nothing to change. Pass --name, --dark-mode, --accent or --language".to_string(),
            ));
        }

        if let Some(code) = &language {
            if !self.language_exists(code) {
                return Err(AppError::Config(format!("Unknown language '{}'", code)));
            }
        }

        if let Some(name) = name {
            self.settings.set_username(&name)?;
        }
        if let Some(dark) = dark_mode {
            self.settings
                .set_theme(if dark { Theme::Dark } else { Theme::Light })?;
        }
        if let Some(accent) = accent {
            self.settings.set_accent(accent)?;
        }
        if let Some(code) = language {
            self.settings.set_language(&code)?;
            self.localizer = Localizer::load(&code, self.lang_dir.as_deref());
            if self.settings.reminder().enabled {
                apply_reminder(&self.settings, &self.localizer, &self.scheduler);
            }
        }
        info!("Profile updated");

        self.profile_show(out)
    }

    fn language_exists(&self, code: &str) -> bool {
        language_info(code).is_some()
            || self
                .lang_dir
                .as_ref()
                .map_or(false, |dir| dir.join(format!("{}.json", code)).is_file())
    }

    fn set_reminder_enabled<W: Write>(
        &mut self,
        enabled: bool,
        at: Option<ReminderTime>,
        out: &mut W,
    ) -> AppResult<()> {
        let current = self.settings.reminder();
        self.settings.set_reminder(ReminderSettings {
            enabled,
            time: at.unwrap_or(current.time),
        })?;
        apply_reminder(&self.settings, &self.localizer, &self.scheduler);
        self.reminder_status(out)
    }

    fn reminder_status<W: Write>(&self, out: &mut W) -> AppResult<()> {
        let pending = self.scheduler.pending(DAILY_REMINDER_ID)?;
        match pending {
            Some(request) => {
                let next = next_fire_after(request.time, Local::now().naive_local());
                writeln!(
                    out,
                    "{}: {} {}",
                    self.text("reminder"),
                    self.text("reminder_on"),
                    request.time
                )?;
                writeln!(
                    out,
                    "{}: {}",
                    self.text("next_reminder"),
                    next.format("%Y-%m-%d %H:%M")
                )?;
            }
            None => {
                if self.settings.reminder().enabled {
                    warn!("Reminder is enabled but nothing is scheduled");
                }
                writeln!(out, "{}: {}", self.text("reminder"), self.text("reminder_off"))?;
            }
        }
        Ok(())
    }

    fn flush_notices<W: Write>(&self, out: &mut W) -> AppResult<()> {
        let events: Vec<StoreEvent> = self.notices.borrow_mut().drain(..).collect();
        for event in events {
            match event {
                StoreEvent::Saved(key) => {
                    writeln!(out, "{} {}", self.accent(self.text("saved")), key)?
                }
                StoreEvent::Cleared => writeln!(out, "{}", self.text("cleared"))?,
            }
        }
        Ok(())
    }
}
