//! Per-user progress and the storage seam the engine reports into.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::ProfileError;
use crate::puzzle::DifficultyTier;

/// Opaque, stable identifier supplied by the surrounding platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: UserId,
    pub solved_count: i64,
    pub cumulative_rating: i64,
    pub current_tier: DifficultyTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            solved_count: 0,
            cumulative_rating: 0,
            current_tier: DifficultyTier::Medium,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mean rating of solved puzzles, 0 before the first solve.
    pub fn average_rating(&self) -> i64 {
        if self.solved_count > 0 {
            self.cumulative_rating / self.solved_count
        } else {
            0
        }
    }
}

/// Read-modify-write step applied atomically by [`ProfileStore::update`].
pub type ProfileMutator = Box<dyn FnOnce(&mut Profile) + Send>;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileError>;

    /// Returns the profile and whether it was created by this call.
    async fn create_if_absent(&self, user_id: &UserId) -> Result<(Profile, bool), ProfileError>;

    /// Apply `mutator` atomically. `None` when the user never registered.
    async fn update(
        &self,
        user_id: &UserId,
        mutator: ProfileMutator,
    ) -> Result<Option<Profile>, ProfileError>;
}

/// Process-local store, used when no database is configured and in tests.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<UserId, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileError> {
        Ok(self.profiles.lock().await.get(user_id).cloned())
    }

    async fn create_if_absent(&self, user_id: &UserId) -> Result<(Profile, bool), ProfileError> {
        let mut profiles = self.profiles.lock().await;
        if let Some(existing) = profiles.get(user_id) {
            return Ok((existing.clone(), false));
        }
        let profile = Profile::new(user_id.clone());
        profiles.insert(user_id.clone(), profile.clone());
        Ok((profile, true))
    }

    async fn update(
        &self,
        user_id: &UserId,
        mutator: ProfileMutator,
    ) -> Result<Option<Profile>, ProfileError> {
        let mut profiles = self.profiles.lock().await;
        Ok(profiles.get_mut(user_id).map(|profile| {
            mutator(profile);
            profile.updated_at = Utc::now();
            profile.clone()
        }))
    }
}
