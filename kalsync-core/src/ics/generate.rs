//! Calendar document generation.

use icalendar::{Alarm, Calendar, Component, EventLike, Property, Trigger, ValueType};

use crate::error::KalsyncResult;
use crate::event::Event;

/// Generate one calendar document containing all given events.
///
/// The whole group is always serialized into a single document; a push is
/// one atomic write of this output.
pub fn generate_calendar(events: &[Event]) -> KalsyncResult<String> {
    let mut cal = Calendar::new();

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event.uid);
        ics_event.summary(&event.title);

        // DTSTAMP - required by RFC 5545, carries the merge tie-breaker
        let dtstamp = event.dtstamp.format("%Y%m%dT%H%M%SZ").to_string();
        ics_event.add_property("DTSTAMP", &dtstamp);

        // Date-only start
        let mut start = Property::new("DTSTART", event.start_date.format("%Y%m%d").to_string());
        start.append_parameter(ValueType::Date);
        ics_event.append_property(start);

        // Alarm as a display VALARM counted back from the start; the
        // description mirrors the title
        if let Some(minutes) = event.alarm_minutes {
            let trigger = Trigger::before_start(chrono::Duration::minutes(i64::from(minutes)));
            let alarm = Alarm::display(&event.title, trigger);
            ics_event.alarm(alarm);
        }

        cal.push(ics_event.done());
    }

    let cal = cal.done();

    // Post-process to remove unnecessary bloat from the icalendar crate's output
    Ok(strip_ics_bloat(&cal.to_string()))
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with KALSYNC (we post-process the output)
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Remove DTSTAMP and UID inside VALARM sections (not required by RFC 5545)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut in_valarm = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:KALSYNC\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
