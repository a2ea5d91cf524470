//! In-memory, per-user session storage.
//!
//! Users are spread over a fixed number of shards. A shard lock is only held
//! long enough to find (or create) the user's slot; the slot itself is an
//! async mutex, so a read-modify-write on one user's session can span awaits
//! (question fetches, score updates, reply sends) without blocking anyone
//! else.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};

use quiz_core::model::{SessionPhase, SessionState, UserId};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<Option<SessionState>>>;

pub const DEFAULT_SHARDS: usize = 16;

/// Concurrency-safe map from user to session state.
pub struct SessionStore {
    shards: Box<[Mutex<HashMap<UserId, Slot>>]>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Build a store with `shards` lock shards (at least one).
    #[must_use]
    pub fn with_shards(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| Mutex::new(HashMap::new()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { shards }
    }

    fn shard_for(&self, user: UserId) -> &Mutex<HashMap<UserId, Slot>> {
        let mut hasher = DefaultHasher::new();
        user.hash(&mut hasher);
        let len = self.shards.len() as u64;
        let index = usize::try_from(hasher.finish() % len).unwrap_or(0);
        &self.shards[index]
    }

    fn slot(&self, user: UserId) -> Slot {
        let mut shard = self
            .shard_for(user)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(shard.entry(user).or_default())
    }

    fn existing_slot(&self, user: UserId) -> Option<Slot> {
        let shard = self
            .shard_for(user)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        shard.get(&user).map(Arc::clone)
    }

    /// Take exclusive access to one user's session until the guard drops.
    ///
    /// Other users are never blocked by the returned guard.
    pub async fn lock(&self, user: UserId) -> SessionGuard {
        let guard = self.slot(user).lock_owned().await;
        SessionGuard { user, guard }
    }

    /// Like [`SessionStore::lock`], but returns `None` instead of creating a
    /// slot for a user the store has never seen.
    pub async fn lock_existing(&self, user: UserId) -> Option<SessionGuard> {
        let guard = self.existing_slot(user)?.lock_owned().await;
        Some(SessionGuard { user, guard })
    }

    /// Snapshot of the user's session, if one exists.
    pub async fn get(&self, user: UserId) -> Option<SessionState> {
        self.lock_existing(user).await?.state().cloned()
    }

    /// Replace the user's session.
    pub async fn set(&self, user: UserId, state: SessionState) {
        self.lock(user).await.replace(state);
    }

    /// Drop the user's session; they start over from topic selection.
    ///
    /// The slot itself is removed unless another task is waiting on it.
    pub async fn reset(&self, user: UserId) {
        let Some(slot) = self.existing_slot(user) else {
            return;
        };
        let mut guard = Arc::clone(&slot).lock_owned().await;
        *guard = None;

        let mut shard = self
            .shard_for(user)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Map entry, `slot` and the guard; any further handle belongs to a waiter.
        let idle = shard.get(&user).is_some_and(|current| Arc::ptr_eq(current, &slot))
            && Arc::strong_count(&slot) == 3;
        if idle {
            shard.remove(&user);
        }
        drop(shard);
        drop(guard);
    }

    /// Number of users currently holding a slot.
    #[cfg(test)]
    pub(crate) fn tracked_users(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }
}

/// Exclusive handle on one user's session.
pub struct SessionGuard {
    user: UserId,
    guard: OwnedMutexGuard<Option<SessionState>>,
}

impl SessionGuard {
    #[must_use]
    pub fn user(&self) -> UserId {
        self.user
    }

    #[must_use]
    pub fn state(&self) -> Option<&SessionState> {
        (*self.guard).as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut SessionState> {
        (*self.guard).as_mut()
    }

    /// Phase of the session; a missing session counts as `Idle`.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        (*self.guard).as_ref().map_or(SessionPhase::Idle, SessionState::phase)
    }

    pub fn replace(&mut self, state: SessionState) {
        *self.guard = Some(state);
    }

    pub fn clear(&mut self) {
        *self.guard = None;
    }
}
