//! Local snapshot store for one queue's entries.
//!
//! [`QueueEntryStore`] holds the current-day entries of a single queue
//! and replaces them wholesale on every refresh — positions are recency-
//! and status-dependent on the server and must never be recomputed or
//! renumbered client-side.
//!
//! Because the timer-driven and push-driven refresh paths may race, every
//! fetch is paired with a sequence number from [`QueueEntryStore::next_seq`];
//! [`QueueEntryStore::install`] discards any snapshot older than the
//! newest one already installed, so a slow response can never overwrite a
//! fresher view.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, watch};

use crate::domain::ids::EntryId;
use crate::domain::queue_entry::{EntryStatus, QueueEntry};

#[derive(Debug, Default)]
struct Snapshot {
    entries: Vec<QueueEntry>,
    /// Sequence of the fetch that produced this snapshot.
    seq: u64,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Ordered snapshot store for one queue's entries.
///
/// Every applied change bumps a [`watch`] channel so render loops can
/// await [`QueueEntryStore::watch_changes`] instead of subscribing to
/// the invalidation bus; timer-driven refreshes reach the screen even
/// when the realtime channel is down.
#[derive(Debug)]
pub struct QueueEntryStore {
    snapshot: RwLock<Snapshot>,
    issued: AtomicU64,
    changed: watch::Sender<u64>,
}

impl Default for QueueEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueEntryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            snapshot: RwLock::new(Snapshot::default()),
            issued: AtomicU64::new(0),
            changed,
        }
    }

    /// Returns a receiver that is marked changed whenever the rendered
    /// snapshot changes (applied install, confirmed transition, clear).
    #[must_use]
    pub fn watch_changes(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    fn mark_changed(&self) {
        self.changed.send_modify(|version| *version += 1);
    }

    /// Issues the sequence number for a refresh about to be fetched.
    /// Call before the network request so that a later-issued fetch
    /// always outranks an earlier one, however their responses land.
    pub fn next_seq(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Replaces the snapshot wholesale with a fetched entry list.
    ///
    /// Returns `false` (and changes nothing) when `seq` is older than the
    /// installed snapshot's sequence — the response lost the race and a
    /// fresher view is already in place.
    pub async fn install(&self, seq: u64, entries: Vec<QueueEntry>) -> bool {
        let mut snapshot = self.snapshot.write().await;
        if seq < snapshot.seq {
            tracing::debug!(seq, installed = snapshot.seq, "discarding stale snapshot");
            return false;
        }
        snapshot.entries = entries;
        snapshot.seq = seq;
        snapshot.refreshed_at = Some(Utc::now());
        drop(snapshot);
        self.mark_changed();
        true
    }

    /// Entries with status `waiting`, sorted ascending by server-assigned
    /// position. Contains nothing else.
    pub async fn waiting(&self) -> Vec<QueueEntry> {
        let snapshot = self.snapshot.read().await;
        let mut waiting: Vec<QueueEntry> = snapshot
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Waiting)
            .cloned()
            .collect();
        waiting.sort_by_key(|e| e.position);
        waiting
    }

    /// Entries in the active-service set (`serving`, `checked_in`,
    /// `in_service`), in server order.
    pub async fn serving(&self) -> Vec<QueueEntry> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .entries
            .iter()
            .filter(|e| e.status.is_in_service())
            .cloned()
            .collect()
    }

    /// Looks up an entry by ID.
    pub async fn entry(&self, entry_id: EntryId) -> Option<QueueEntry> {
        let snapshot = self.snapshot.read().await;
        snapshot.entries.iter().find(|e| e.id == entry_id).cloned()
    }

    /// Applies a server-confirmed entry update in place.
    ///
    /// Called only after the mutating request succeeded, with the
    /// server's own copy of the entry. If the new status leaves the
    /// active set the entry is dropped from the view; remaining
    /// `position` values are left untouched — the refresh triggered by
    /// the mutation's own change notification corrects the ordering
    /// authoritatively.
    ///
    /// Returns `false` if the entry is not in the snapshot.
    pub async fn apply_confirmed(&self, updated: QueueEntry) -> bool {
        let mut snapshot = self.snapshot.write().await;
        let Some(index) = snapshot.entries.iter().position(|e| e.id == updated.id) else {
            return false;
        };
        if updated.status.is_active() {
            if let Some(slot) = snapshot.entries.get_mut(index) {
                *slot = updated;
            }
        } else {
            snapshot.entries.remove(index);
        }
        drop(snapshot);
        self.mark_changed();
        true
    }

    /// Number of entries in the snapshot (all statuses).
    pub async fn len(&self) -> usize {
        self.snapshot.read().await.entries.len()
    }

    /// Returns `true` if the snapshot holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.snapshot.read().await.entries.is_empty()
    }

    /// When the installed snapshot was fetched, if ever.
    pub async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().await.refreshed_at
    }

    /// Drops all entries and resets the refresh timestamp. Sequence
    /// numbering is preserved so in-flight fetches still rank correctly.
    pub async fn clear(&self) {
        let mut snapshot = self.snapshot.write().await;
        snapshot.entries.clear();
        snapshot.refreshed_at = None;
        drop(snapshot);
        self.mark_changed();
    }
}
