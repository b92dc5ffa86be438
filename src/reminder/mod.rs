//! Daily reminder scheduling.
//!
//! The reminder is a single repeating request identified by
//! `kansha.dailyReminder`. Turning the reminder on replaces any pending
//! request with one carrying the current time and localized text; turning it
//! off cancels it. Scheduling is fire-and-forget: `apply_reminder` logs what
//! went wrong and returns normally.

use crate::constants::{DAILY_REMINDER_ID, PREF_PENDING_NOTIFICATIONS};
use crate::errors::{ReminderError, StorageError};
use crate::locale::Localizer;
use crate::settings::{ReminderTime, Settings};
use crate::storage::{PrefValue, PreferenceStorage};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A notification that repeats every day at `time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub id: String,
    pub title: String,
    pub body: String,
    pub time: ReminderTime,
}

/// Something that can deliver repeating notifications.
pub trait NotificationScheduler {
    /// Asks the user for permission to notify. Returns whether it was granted.
    fn request_authorization(&self) -> bool;

    /// Adds `request`, replacing any pending request with the same id.
    fn schedule_daily(&self, request: &NotificationRequest) -> Result<(), ReminderError>;

    /// Removes the pending request with `id`, if there is one.
    fn cancel(&self, id: &str) -> Result<(), ReminderError>;

    /// The pending request with `id`.
    fn pending(&self, id: &str) -> Result<Option<NotificationRequest>, ReminderError>;
}

/// Builds the daily reminder request in the given language.
pub fn daily_request(time: ReminderTime, localizer: &Localizer) -> NotificationRequest {
    NotificationRequest {
        id: DAILY_REMINDER_ID.to_string(),
        title: localizer.localized("reminder_title").to_string(),
        body: localizer.localized("reminder_body").to_string(),
        time,
    }
}

/// Brings the scheduler in line with the reminder settings.
///
/// When the reminder is enabled, authorization is requested and the daily
/// request is (re)scheduled; a denied authorization leaves nothing scheduled.
/// When disabled, the pending request is cancelled. Failures are logged.
pub fn apply_reminder<S, N>(settings: &Settings<S>, localizer: &Localizer, scheduler: &N)
where
    S: PreferenceStorage,
    N: NotificationScheduler + ?Sized,
{
    let reminder = settings.reminder();

    if !reminder.enabled {
        match scheduler.cancel(DAILY_REMINDER_ID) {
            Ok(()) => info!("Daily reminder cancelled"),
            Err(e) => warn!(error = %e, "Failed to cancel daily reminder"),
        }
        return;
    }

    if !scheduler.request_authorization() {
        warn!(error = %ReminderError::NotAuthorized, "Daily reminder not scheduled");
        return;
    }

    let request = daily_request(reminder.time, localizer);
    match scheduler.schedule_daily(&request) {
        Ok(()) => info!(time = %request.time, language = localizer.code(), "Daily reminder scheduled"),
        Err(e) => warn!(error = %e, "Failed to schedule daily reminder"),
    }
}

/// The first moment strictly after `now` at which a reminder set for `time`
/// fires: today if that time is still ahead, otherwise tomorrow.
pub fn next_fire_after(time: ReminderTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now
        .date()
        .and_hms_opt(time.hour(), time.minute(), 0)
        .unwrap_or(now);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Records pending requests in preference storage.
///
/// Requests are kept as a JSON object of id to request under
/// `kansha.pendingNotifications`, so later invocations can report what is
/// scheduled. Authorization is always granted.
#[derive(Debug, Clone)]
pub struct PreferenceScheduler<S: PreferenceStorage> {
    storage: S,
}

type PendingMap = BTreeMap<String, NotificationRequest>;

impl<S: PreferenceStorage> PreferenceScheduler<S> {
    pub fn new(storage: S) -> Self {
        PreferenceScheduler { storage }
    }

    fn load(&self) -> Result<PendingMap, ReminderError> {
        match self.storage.get_string(PREF_PENDING_NOTIFICATIONS)? {
            Some(text) => Ok(serde_json::from_str(&text).map_err(StorageError::Decode)?),
            None => Ok(PendingMap::new()),
        }
    }

    /// The pending map, or an empty one when the stored value is unreadable.
    /// The flag is set when a stored value was discarded.
    fn load_or_discard(&self) -> (PendingMap, bool) {
        match self.load() {
            Ok(pending) => (pending, false),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable pending notifications");
                (PendingMap::new(), true)
            }
        }
    }

    fn save(&self, pending: &PendingMap) -> Result<(), ReminderError> {
        if pending.is_empty() {
            self.storage.remove(PREF_PENDING_NOTIFICATIONS)?;
            return Ok(());
        }
        let text = serde_json::to_string(pending).map_err(StorageError::Encode)?;
        self.storage
            .set(PREF_PENDING_NOTIFICATIONS, PrefValue::Text(text))?;
        Ok(())
    }
}

impl<S: PreferenceStorage> NotificationScheduler for PreferenceScheduler<S> {
    fn request_authorization(&self) -> bool {
        true
    }

    fn schedule_daily(&self, request: &NotificationRequest) -> Result<(), ReminderError> {
        let (mut pending, _) = self.load_or_discard();
        pending.insert(request.id.clone(), request.clone());
        debug!(id = %request.id, time = %request.time, "Recording pending notification");
        self.save(&pending)
    }

    fn cancel(&self, id: &str) -> Result<(), ReminderError> {
        let (mut pending, discarded) = self.load_or_discard();
        let removed = pending.remove(id).is_some();
        if removed {
            debug!(id, "Removing pending notification");
        }
        if removed || discarded {
            self.save(&pending)?;
        }
        Ok(())
    }

    fn pending(&self, id: &str) -> Result<Option<NotificationRequest>, ReminderError> {
        Ok(self.load()?.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ReminderSettings;
    use crate::storage::MemoryPreferences;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingScheduler {
        deny: bool,
        fail: bool,
        calls: RefCell<Vec<String>>,
        scheduled: RefCell<Option<NotificationRequest>>,
    }

    impl NotificationScheduler for RecordingScheduler {
        fn request_authorization(&self) -> bool {
            self.calls.borrow_mut().push("authorize".into());
            !self.deny
        }

        fn schedule_daily(&self, request: &NotificationRequest) -> Result<(), ReminderError> {
            self.calls.borrow_mut().push(format!("schedule {}", request.time));
            if self.fail {
                return Err(ReminderError::Storage(StorageError::Rejected("offline".into())));
            }
            *self.scheduled.borrow_mut() = Some(request.clone());
            Ok(())
        }

        fn cancel(&self, id: &str) -> Result<(), ReminderError> {
            self.calls.borrow_mut().push(format!("cancel {}", id));
            *self.scheduled.borrow_mut() = None;
            Ok(())
        }

        fn pending(&self, _id: &str) -> Result<Option<NotificationRequest>, ReminderError> {
            Ok(self.scheduled.borrow().clone())
        }
    }

    fn settings_with(enabled: bool, hour: u32, minute: u32) -> Settings<MemoryPreferences> {
        let settings = Settings::new(MemoryPreferences::new());
        settings
            .set_reminder(ReminderSettings {
                enabled,
                time: ReminderTime::new(hour, minute).unwrap(),
            })
            .unwrap();
        settings
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_enabled_reminder_is_scheduled_with_localized_text() {
        let settings = settings_with(true, 21, 0);
        let localizer = Localizer::load("en", None);
        let scheduler = RecordingScheduler::default();

        apply_reminder(&settings, &localizer, &scheduler);

        assert_eq!(*scheduler.calls.borrow(), vec!["authorize", "schedule 21:00"]);
        let request = scheduler.pending(DAILY_REMINDER_ID).unwrap().unwrap();
        assert_eq!(request.id, "kansha.dailyReminder");
        assert_eq!(request.title, localizer.localized("reminder_title"));
        assert_eq!(request.body, localizer.localized("reminder_body"));
    }

    #[test]
    fn test_disabled_reminder_is_cancelled() {
        let settings = settings_with(false, 21, 0);
        let localizer = Localizer::load("en", None);
        let scheduler = RecordingScheduler::default();

        apply_reminder(&settings, &localizer, &scheduler);

        assert_eq!(*scheduler.calls.borrow(), vec!["cancel kansha.dailyReminder"]);
    }

    #[test]
    fn test_denied_authorization_schedules_nothing() {
        let settings = settings_with(true, 8, 15);
        let localizer = Localizer::load("en", None);
        let scheduler = RecordingScheduler {
            deny: true,
            ..Default::default()
        };

        apply_reminder(&settings, &localizer, &scheduler);

        assert_eq!(*scheduler.calls.borrow(), vec!["authorize"]);
        assert!(scheduler.pending(DAILY_REMINDER_ID).unwrap().is_none());
    }

    #[test]
    fn test_scheduling_failure_is_swallowed() {
        let settings = settings_with(true, 8, 15);
        let localizer = Localizer::load("en", None);
        let scheduler = RecordingScheduler {
            fail: true,
            ..Default::default()
        };

        apply_reminder(&settings, &localizer, &scheduler);

        assert!(scheduler.pending(DAILY_REMINDER_ID).unwrap().is_none());
    }

    #[test]
    fn test_next_fire_later_today() {
        let time = ReminderTime::new(21, 0).unwrap();
        assert_eq!(next_fire_after(time, at(9, 30)), at(21, 0));
    }

    #[test]
    fn test_next_fire_tomorrow_when_passed_or_equal() {
        let time = ReminderTime::new(21, 0).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        assert_eq!(next_fire_after(time, at(21, 0)), tomorrow);
        assert_eq!(next_fire_after(time, at(23, 59)), tomorrow);
    }

    #[test]
    fn test_preference_scheduler_round_trip() {
        let prefs = MemoryPreferences::new();
        let scheduler = PreferenceScheduler::new(prefs.clone());
        let request = daily_request(ReminderTime::new(7, 0).unwrap(), &Localizer::load("ja", None));

        scheduler.schedule_daily(&request).unwrap();
        assert_eq!(scheduler.pending(DAILY_REMINDER_ID).unwrap(), Some(request.clone()));

        // A second handle over the same storage sees the same request.
        let reopened = PreferenceScheduler::new(prefs.clone());
        assert_eq!(reopened.pending(DAILY_REMINDER_ID).unwrap(), Some(request));

        reopened.cancel(DAILY_REMINDER_ID).unwrap();
        assert!(scheduler.pending(DAILY_REMINDER_ID).unwrap().is_none());
        assert!(prefs.get(PREF_PENDING_NOTIFICATIONS).unwrap().is_none());
    }

    #[test]
    fn test_rescheduling_replaces_pending_request() {
        let scheduler = PreferenceScheduler::new(MemoryPreferences::new());
        let localizer = Localizer::load("en", None);

        scheduler
            .schedule_daily(&daily_request(ReminderTime::new(7, 0).unwrap(), &localizer))
            .unwrap();
        scheduler
            .schedule_daily(&daily_request(ReminderTime::new(22, 45).unwrap(), &localizer))
            .unwrap();

        let pending = scheduler.pending(DAILY_REMINDER_ID).unwrap().unwrap();
        assert_eq!(pending.time.to_string(), "22:45");
    }

    #[test]
    fn test_apply_reminder_with_preference_scheduler() {
        let prefs = MemoryPreferences::new();
        let settings = Settings::new(prefs.clone());
        let scheduler = PreferenceScheduler::new(prefs.clone());
        let localizer = Localizer::load("vi", None);

        settings
            .set_reminder(ReminderSettings {
                enabled: true,
                time: ReminderTime::new(20, 30).unwrap(),
            })
            .unwrap();
        apply_reminder(&settings, &localizer, &scheduler);
        assert!(scheduler.pending(DAILY_REMINDER_ID).unwrap().is_some());

        settings
            .set_reminder(ReminderSettings {
                enabled: false,
                time: ReminderTime::new(20, 30).unwrap(),
            })
            .unwrap();
        apply_reminder(&settings, &localizer, &scheduler);
        assert!(scheduler.pending(DAILY_REMINDER_ID).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_pending_value_is_reported() {
        let prefs = MemoryPreferences::new();
        prefs
            .set(PREF_PENDING_NOTIFICATIONS, PrefValue::from("not json"))
            .unwrap();
        let scheduler = PreferenceScheduler::new(prefs);

        assert!(matches!(
            scheduler.pending(DAILY_REMINDER_ID),
            Err(ReminderError::Storage(StorageError::Decode(_)))
        ));
    }

    #[test]
    fn test_cancel_clears_corrupt_pending_value() {
        let prefs = MemoryPreferences::new();
        prefs
            .set(PREF_PENDING_NOTIFICATIONS, PrefValue::from("not json"))
            .unwrap();
        let scheduler = PreferenceScheduler::new(prefs.clone());

        scheduler.cancel(DAILY_REMINDER_ID).unwrap();
        assert_eq!(scheduler.pending(DAILY_REMINDER_ID).unwrap(), None);
        assert!(prefs.get(PREF_PENDING_NOTIFICATIONS).unwrap().is_none());
    }
}
