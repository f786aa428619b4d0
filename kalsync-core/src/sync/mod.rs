//! Pull/merge synchronization against a remote calendar.

mod merge;
mod resolve;

pub use merge::{Conflict, apply_resolution, merge};
pub use resolve::{ConflictResolver, Resolution};

use tracing::{info, instrument, warn};

use crate::error::KalsyncResult;
use crate::remote::{Credentials, RemoteCalendar};
use crate::retry::{RetryConfig, push_with_retry};
use crate::store::EventStore;

/// Counters describing one completed sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Events in the fetched remote document.
    pub fetched: usize,
    /// Remote-only events inserted locally.
    pub added: usize,
    /// Conflicts surfaced (all resolved by the time sync returns).
    pub conflicts: usize,
}

/// Orchestrates fetch, merge, conflict resolution and commit for one store.
///
/// The engine is sequential and not reentrant for a group: it reads,
/// mutates and replaces store state without internal locking, so the host
/// runs at most one sync or push per group at a time.
pub struct SyncEngine<S: EventStore> {
    store: S,
    retry: RetryConfig,
}

impl<S: EventStore> SyncEngine<S> {
    pub fn new(store: S) -> Self {
        SyncEngine {
            store,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(store: S, retry: RetryConfig) -> Self {
        SyncEngine { store, retry }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Pull the remote document, merge it into the stored group, resolve
    /// conflicts through `resolver` and commit the result in one replace.
    ///
    /// A fetch or parse failure returns before any local mutation: either
    /// all parsed remote events are merged, or none are.
    #[instrument(skip(self, remote, credentials, resolver))]
    pub async fn sync<R: ConflictResolver>(
        &mut self,
        remote: &RemoteCalendar,
        credentials: Option<&Credentials>,
        group_name: &str,
        resolver: &mut R,
    ) -> KalsyncResult<SyncReport> {
        let mut group = self.store.load_group(group_name)?;
        let before = group.events.len();

        let remote_events = match remote.fetch(credentials).await {
            Ok(events) => events,
            Err(e) => {
                warn!(group = group_name, error = %e, "fetch failed, local state untouched");
                return Err(e);
            }
        };
        let fetched = remote_events.len();

        let conflicts = merge(&mut group, remote_events);
        let added = group.events.len() - before;

        for conflict in &conflicts {
            let resolution = resolver.resolve(conflict);
            info!(group = group_name, uid = %conflict.uid, ?resolution, "conflict resolved");
            apply_resolution(&mut group, conflict, resolution);
        }

        self.store.replace_group(&group)?;

        info!(
            group = group_name,
            fetched,
            added,
            conflicts = conflicts.len(),
            "sync complete"
        );
        Ok(SyncReport {
            fetched,
            added,
            conflicts: conflicts.len(),
        })
    }

    /// Serialize the stored group in full and transmit it with retry.
    ///
    /// Deleted local events are simply absent from the document; they are
    /// never communicated as deletions.
    #[instrument(skip(self, remote, credentials))]
    pub async fn push(
        &self,
        remote: &RemoteCalendar,
        credentials: &Credentials,
        group_name: &str,
    ) -> KalsyncResult<()> {
        let group = self.store.load_group(group_name)?;
        push_with_retry(&self.retry, || remote.push(credentials, &group.events)).await
    }
}
