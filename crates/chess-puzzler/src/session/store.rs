//! Concurrent map of per-user session slots.
//!
//! Each user owns one slot behind its own async mutex. Holding the slot guard
//! is the per-user critical section: actions for the same user serialize,
//! actions for different users never contend beyond the brief map lookup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use super::Session;
use crate::profile::UserId;

/// Everything kept for one user between actions.
#[derive(Debug)]
pub struct Slot {
    session: Option<Session>,
    /// Solve credits the profile store has not accepted yet.
    pending_credits: Vec<i32>,
    last_active: Instant,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            session: None,
            pending_credits: Vec::new(),
            last_active: Instant::now(),
        }
    }
}

impl Slot {
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Install a new session, returning whatever it displaced.
    pub fn replace(&mut self, session: Session) -> Option<Session> {
        self.session.replace(session)
    }

    pub fn clear(&mut self) -> Option<Session> {
        self.session.take()
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }

    pub fn pending_credits(&self) -> &[i32] {
        &self.pending_credits
    }

    pub fn push_pending_credit(&mut self, rating: i32) {
        self.pending_credits.push(rating);
    }

    pub fn take_pending_credits(&mut self) -> Vec<i32> {
        std::mem::take(&mut self.pending_credits)
    }

    /// Put back credits that still could not be written, ahead of newer ones.
    pub fn restore_pending_credits(&mut self, mut credits: Vec<i32>) {
        credits.append(&mut self.pending_credits);
        self.pending_credits = credits;
    }

    fn is_evictable(&self, ttl: Duration) -> bool {
        if !self.pending_credits.is_empty() {
            return false;
        }
        self.session.is_none() || self.idle_for() >= ttl
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    slots: RwLock<HashMap<UserId, Arc<Mutex<Slot>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the user's critical section, creating the slot on first use.
    pub async fn lock(&self, user_id: &UserId) -> OwnedMutexGuard<Slot> {
        let existing = self.slots.read().await.get(user_id).cloned();
        let slot = match existing {
            Some(slot) => slot,
            None => self
                .slots
                .write()
                .await
                .entry(user_id.clone())
                .or_default()
                .clone(),
        };
        slot.lock_owned().await
    }

    /// Install `session` for the user, discarding any previous one.
    pub async fn start_session(&self, user_id: &UserId, session: Session) -> Option<Session> {
        let mut slot = self.lock(user_id).await;
        slot.touch();
        slot.replace(session)
    }

    /// Snapshot of the user's current session.
    pub async fn get(&self, user_id: &UserId) -> Option<Session> {
        let slot = self.slots.read().await.get(user_id).cloned()?;
        let guard = slot.lock().await;
        guard.session().cloned()
    }

    /// Drop the user's session. Returns whether one existed.
    pub async fn remove(&self, user_id: &UserId) -> bool {
        let Some(slot) = self.slots.read().await.get(user_id).cloned() else {
            return false;
        };
        let mut guard = slot.lock().await;
        guard.clear().is_some()
    }

    /// Remove slots untouched for at least `ttl`.
    ///
    /// Slots that are currently locked, or referenced by an in-flight action,
    /// or still owe credits to the profile store are left alone.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|user_id, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            let evict = match slot.try_lock() {
                Ok(guard) => guard.is_evictable(ttl),
                Err(_) => false,
            };
            if evict {
                tracing::debug!(user_id = %user_id, "Evicting idle session slot");
            }
            !evict
        });
        before - slots.len()
    }

    /// Number of users holding a slot.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
