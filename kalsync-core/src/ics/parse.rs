//! Calendar document parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDateTime, Utc};
use icalendar::{
    DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};
use tracing::warn;

use crate::error::{KalsyncError, KalsyncResult};
use crate::event::Event;

/// Parse a calendar document into events.
///
/// A document that cannot be read at all is a parse failure. Individual
/// records are handled leniently: a VEVENT without a UID or a usable start
/// date is skipped, a missing or malformed DTSTAMP is substituted with the
/// current time, and a malformed alarm drops the alarm but keeps the event.
pub fn parse_calendar(content: &str) -> KalsyncResult<Vec<Event>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| KalsyncError::Parse(e.to_string()))?;

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(|vevent| {
            let parsed = parse_vevent(vevent);
            if parsed.is_none() {
                warn!("skipping calendar record without uid or usable start date");
            }
            parsed
        })
        .collect();

    Ok(events)
}

/// Parse one VEVENT into an Event struct
fn parse_vevent(vevent: &Component) -> Option<Event> {
    let uid = vevent.find_prop("UID")?.val.to_string();
    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| "(No title)".to_string());

    // Date-only start; datetimes are truncated to their calendar date
    let start_date = match DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()? {
        DatePerhapsTime::Date(d) => d,
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            icalendar::CalendarDateTime::Utc(dt) => dt.date_naive(),
            icalendar::CalendarDateTime::Floating(naive) => naive.date(),
            icalendar::CalendarDateTime::WithTimezone { date_time, .. } => date_time.date(),
        },
    };

    let dtstamp = vevent
        .find_prop("DTSTAMP")
        .and_then(|p| parse_dtstamp(p.val.as_ref()))
        .unwrap_or_else(Utc::now);

    // First VALARM, if any; a trigger we cannot read never fails the event
    let alarm_minutes = vevent
        .components
        .iter()
        .find(|c| c.name == "VALARM")
        .and_then(|alarm| alarm.find_prop("TRIGGER"))
        .and_then(|p| parse_alarm_minutes(p.val.as_ref()));

    Some(Event {
        uid,
        title,
        start_date,
        dtstamp,
        alarm_minutes,
    })
}

/// Parse a DTSTAMP value (20250610T120000Z or without the Z suffix)
fn parse_dtstamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y%m%dT%H%M%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Parse a TRIGGER value (-PT30M, -P1D, etc.) into minutes before the event.
///
/// The offset is the absolute value of the trigger duration, regardless of
/// its sign.
fn parse_alarm_minutes(value: &str) -> Option<u32> {
    let duration_str = value.trim_start_matches(['-', '+']);
    let duration = iso8601::duration(duration_str).ok()?;
    let std_duration: std::time::Duration = duration.into();
    Some((std_duration.as_secs() / 60) as u32)
}
