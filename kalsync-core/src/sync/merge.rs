//! Last-writer-wins merge of remote events into a local group.
//!
//! Remote data is only considered when its dtstamp is strictly newer than
//! the local copy's. Clock skew between the two sides can cause missed or
//! spurious conflicts; that is inherent to the policy, not something the
//! merge tries to correct.

use std::collections::HashMap;

use tracing::debug;

use crate::event::{Event, Group};
use crate::sync::resolve::Resolution;

/// A detected divergence between the local and remote copy of one uid.
///
/// Both snapshots are full owned copies taken at merge time, so resolving
/// a conflict cannot alias back into the live group.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub uid: String,
    pub local: Event,
    pub remote: Event,
}

/// Merge remote events into `local`, mutating it in place for
/// non-conflicting changes and returning the unresolved conflicts.
///
/// For each remote event, matched against local by uid:
/// - no local match: inserted verbatim;
/// - remote strictly newer and any of title/date/alarm differs: a conflict
///   is recorded and the local event stays untouched until resolved;
/// - remote strictly newer with equal fields: local is overwritten, which
///   only advances the dtstamp;
/// - remote older or equal: local wins silently, even when fields differ.
///
/// Merge never deletes: a local event whose uid never appears remotely is
/// left alone. Note the asymmetry of the newer-local case: a diverging
/// remote copy with an older or equal stamp raises no conflict, and the
/// next push will overwrite the server's copy of it.
pub fn merge(local: &mut Group, remote: Vec<Event>) -> Vec<Conflict> {
    let mut index: HashMap<String, usize> = local
        .events
        .iter()
        .enumerate()
        .map(|(i, e)| (e.uid.clone(), i))
        .collect();

    let mut conflicts = Vec::new();

    for r in remote {
        match index.get(&r.uid).copied() {
            None => {
                debug!(uid = %r.uid, "inserting remote-only event");
                index.insert(r.uid.clone(), local.events.len());
                local.events.push(r);
            }
            Some(i) => {
                let l = &mut local.events[i];
                if r.dtstamp > l.dtstamp {
                    if l.same_fields(&r) {
                        // No visible change; keep the newer stamp.
                        *l = r;
                    } else {
                        debug!(uid = %r.uid, "remote copy is newer and diverges");
                        conflicts.push(Conflict {
                            uid: r.uid.clone(),
                            local: l.clone(),
                            remote: r,
                        });
                    }
                }
                // Older or equal remote copy: local wins silently.
            }
        }
    }

    conflicts
}

/// Replace the live local event wholesale with the chosen snapshot, dtstamp
/// included.
pub fn apply_resolution(local: &mut Group, conflict: &Conflict, resolution: Resolution) {
    let chosen = match resolution {
        Resolution::KeepLocal => &conflict.local,
        Resolution::KeepRemote => &conflict.remote,
    };
    if let Some(event) = local.find_mut(&conflict.uid) {
        *event = chosen.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn stamp(offset_secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + chrono::Duration::seconds(offset_secs)
    }

    fn event(uid: &str, title: &str, day: u32, offset_secs: i64) -> Event {
        Event {
            uid: uid.to_string(),
            title: title.to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 7, day).unwrap(),
            dtstamp: stamp(offset_secs),
            alarm_minutes: None,
        }
    }

    fn group_with(events: Vec<Event>) -> Group {
        let mut group = Group::new("default");
        group.events = events;
        group
    }

    #[test]
    fn test_unmatched_remote_is_inserted_without_conflict() {
        let mut local = group_with(vec![event("X", "Meeting", 1, 0)]);

        let conflicts = merge(&mut local, vec![event("Y", "Offsite", 2, 0)]);

        assert!(conflicts.is_empty());
        assert_eq!(local.events.len(), 2);
        assert!(local.find("Y").is_some());
    }

    #[test]
    fn test_newer_diverging_remote_raises_conflict_and_leaves_local() {
        let mut local = group_with(vec![event("X", "Meeting", 1, 0)]);

        let conflicts = merge(&mut local, vec![event("X", "Sync", 1, 10)]);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].uid, "X");
        assert_eq!(conflicts[0].local.title, "Meeting");
        assert_eq!(conflicts[0].remote.title, "Sync");
        // Local stays untouched until the conflict is resolved
        assert_eq!(local.find("X").unwrap().title, "Meeting");
        assert_eq!(local.find("X").unwrap().dtstamp, stamp(0));
    }

    #[test]
    fn test_keep_remote_replaces_event_and_stamp() {
        let mut local = group_with(vec![event("X", "Meeting", 1, 0)]);
        let conflicts = merge(&mut local, vec![event("X", "Sync", 1, 10)]);

        apply_resolution(&mut local, &conflicts[0], Resolution::KeepRemote);

        let resolved = local.find("X").unwrap();
        assert_eq!(resolved.title, "Sync");
        assert_eq!(resolved.dtstamp, stamp(10));
    }

    #[test]
    fn test_keep_local_restores_local_snapshot() {
        let mut local = group_with(vec![event("X", "Meeting", 1, 0)]);
        let conflicts = merge(&mut local, vec![event("X", "Sync", 1, 10)]);

        apply_resolution(&mut local, &conflicts[0], Resolution::KeepLocal);

        let resolved = local.find("X").unwrap();
        assert_eq!(resolved.title, "Meeting");
        assert_eq!(resolved.dtstamp, stamp(0));
    }

    #[test]
    fn test_newer_remote_with_equal_fields_only_advances_stamp() {
        let mut local = group_with(vec![event("X", "Meeting", 1, 0)]);

        let conflicts = merge(&mut local, vec![event("X", "Meeting", 1, 10)]);

        assert!(conflicts.is_empty());
        let merged = local.find("X").unwrap();
        assert_eq!(merged.title, "Meeting");
        assert_eq!(merged.dtstamp, stamp(10));
    }

    #[test]
    fn test_older_or_equal_remote_never_touches_local() {
        let mut local = group_with(vec![event("X", "Meeting", 1, 10)]);

        // Equal stamp, diverging fields
        let conflicts = merge(&mut local, vec![event("X", "Sync", 2, 10)]);
        assert!(conflicts.is_empty());
        assert_eq!(local.find("X").unwrap().title, "Meeting");

        // Older stamp, diverging fields
        let conflicts = merge(&mut local, vec![event("X", "Sync", 2, 5)]);
        assert!(conflicts.is_empty());
        assert_eq!(local.find("X").unwrap().title, "Meeting");
        assert_eq!(local.find("X").unwrap().start_date, event("X", "", 1, 0).start_date);
    }

    #[test]
    fn test_alarm_difference_alone_is_a_divergence() {
        let mut local = group_with(vec![event("X", "Meeting", 1, 0)]);
        let mut remote = event("X", "Meeting", 1, 10);
        remote.alarm_minutes = Some(30);

        let conflicts = merge(&mut local, vec![remote]);

        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn test_merge_never_deletes_local_only_events() {
        let mut local = group_with(vec![event("X", "Meeting", 1, 0), event("Z", "Lunch", 3, 0)]);

        let conflicts = merge(&mut local, vec![event("X", "Meeting", 1, 10)]);

        assert!(conflicts.is_empty());
        assert!(local.find("Z").is_some());
        assert_eq!(local.events.len(), 2);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let remote = vec![
            event("X", "Sync", 1, 10),
            event("Y", "Offsite", 2, 0),
        ];

        let mut once = group_with(vec![event("X", "Meeting", 1, 0)]);
        let conflicts = merge(&mut once, remote.clone());
        for conflict in &conflicts {
            apply_resolution(&mut once, conflict, Resolution::KeepRemote);
        }

        let mut twice = once.clone();
        let conflicts = merge(&mut twice, remote);
        assert!(conflicts.is_empty());
        assert_eq!(twice, once);
    }
}
