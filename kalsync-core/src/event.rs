//! Event and group types.
//!
//! An `Event` is one scheduled item; a `Group` is the named collection of
//! events that gets synced and pushed as a unit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{KalsyncError, KalsyncResult};

/// A scheduled item within a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stable identifier, assigned once at creation.
    pub uid: String,
    pub title: String,
    /// Calendar date of the event (no time-of-day).
    pub start_date: NaiveDate,
    /// Last-modification timestamp. Refreshed on every local edit and used
    /// as the tie-breaker during merge, never for scheduling.
    pub dtstamp: DateTime<Utc>,
    /// Minutes before `start_date` to raise a notification.
    pub alarm_minutes: Option<u32>,
}

impl Event {
    /// Create a new event with a fresh uid and the current dtstamp.
    pub fn new(
        title: &str,
        start_date: NaiveDate,
        alarm_minutes: Option<u32>,
    ) -> KalsyncResult<Self> {
        validate_title(title)?;
        Ok(Event {
            uid: Uuid::new_v4().to_string(),
            title: title.to_string(),
            start_date,
            dtstamp: Utc::now(),
            alarm_minutes,
        })
    }

    /// Apply a local edit, refreshing the dtstamp.
    pub fn update(
        &mut self,
        title: &str,
        start_date: NaiveDate,
        alarm_minutes: Option<u32>,
    ) -> KalsyncResult<()> {
        validate_title(title)?;
        self.title = title.to_string();
        self.start_date = start_date;
        self.alarm_minutes = alarm_minutes;
        self.dtstamp = Utc::now();
        Ok(())
    }

    /// Whether the user-visible fields match (uid and dtstamp excluded).
    pub fn same_fields(&self, other: &Event) -> bool {
        self.title == other.title
            && self.start_date == other.start_date
            && self.alarm_minutes == other.alarm_minutes
    }
}

fn validate_title(title: &str) -> KalsyncResult<()> {
    if title.trim().is_empty() {
        return Err(KalsyncError::Validation("title must not be empty".into()));
    }
    Ok(())
}

/// A named collection of events.
///
/// Order is display-only; merge and conflict detection treat membership as
/// a set keyed by uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub events: Vec<Event>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Group {
            name: name.to_string(),
            events: Vec::new(),
        }
    }

    pub fn find(&self, uid: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.uid == uid)
    }

    pub fn find_mut(&mut self, uid: &str) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.uid == uid)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_event_rejects_empty_title() {
        let result = Event::new("   ", date(2025, 6, 1), None);
        assert!(matches!(result, Err(KalsyncError::Validation(_))));
    }

    #[test]
    fn test_new_events_get_distinct_uids() {
        let a = Event::new("Standup", date(2025, 6, 1), Some(10)).unwrap();
        let b = Event::new("Standup", date(2025, 6, 1), Some(10)).unwrap();
        assert_ne!(a.uid, b.uid);
    }

    #[test]
    fn test_update_refreshes_dtstamp_and_keeps_uid() {
        let mut event = Event::new("Standup", date(2025, 6, 1), None).unwrap();
        let uid = event.uid.clone();
        let stamp = event.dtstamp;

        event.update("Planning", date(2025, 6, 2), Some(15)).unwrap();

        assert_eq!(event.uid, uid);
        assert_eq!(event.title, "Planning");
        assert!(event.dtstamp >= stamp);
    }

    #[test]
    fn test_same_fields_ignores_dtstamp() {
        let a = Event::new("Standup", date(2025, 6, 1), Some(5)).unwrap();
        let mut b = a.clone();
        b.dtstamp = b.dtstamp + chrono::Duration::hours(1);
        assert!(a.same_fields(&b));

        b.title = "Retro".to_string();
        assert!(!a.same_fields(&b));
    }
}
