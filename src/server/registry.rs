//! Per-match coordination: the lock that serializes transitions, the
//! cancellation token and the pending bot task.

use dashmap::DashMap;
use log::debug;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::GameId;

/// Coordination handles for one live match.
#[derive(Debug, Default)]
pub struct MatchEntry {
    lock: Mutex<()>,
    pub cancel: CancellationToken,
    bot_task: Mutex<Option<JoinHandle<()>>>,
}

impl MatchEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold while loading, mutating and storing this match.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    /// Slot holding the pending bot task. Callers keep the guard across
    /// spawning and storing so that a fast task cannot be overwritten by
    /// its own predecessor.
    pub fn bot_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.bot_task.lock()
    }

    /// Store a new pending bot task, aborting the previous one.
    pub fn set_bot_task(&self, handle: JoinHandle<()>) {
        if let Some(existing) = self.bot_task.lock().replace(handle) {
            existing.abort();
        }
    }

    pub fn has_bot_task(&self) -> bool {
        self.bot_task
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn cancel_all(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.bot_task.lock().take() {
            handle.abort();
        }
    }
}

/// Live matches by id. Entries are created on first use.
#[derive(Debug, Default)]
pub struct MatchRegistry {
    entries: DashMap<GameId, Arc<MatchEntry>>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for `game_id`, created if missing. The map shard is
    /// released before returning so callers never lock a match while
    /// holding it.
    pub fn entry(&self, game_id: &GameId) -> Arc<MatchEntry> {
        if let Some(entry) = self.entries.get(game_id) {
            return Arc::clone(entry.value());
        }
        Arc::clone(
            self.entries
                .entry(game_id.clone())
                .or_insert_with(|| Arc::new(MatchEntry::new()))
                .value(),
        )
    }

    /// Cancel pending work for a match and forget it.
    pub fn retire(&self, game_id: &GameId) {
        if let Some((_, entry)) = self.entries.remove(game_id) {
            entry.cancel_all();
            debug!("[SERVER] {} retired", game_id);
        }
    }

    pub fn contains(&self, game_id: &GameId) -> bool {
        self.entries.contains_key(game_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
