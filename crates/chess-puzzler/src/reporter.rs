//! Outcome Reporter: turns terminal attempts into profile updates.

use std::sync::Arc;

use crate::error::ProfileError;
use crate::profile::{Profile, ProfileStore, UserId};
use crate::puzzle::DifficultyTier;

#[derive(Clone)]
pub struct OutcomeReporter {
    store: Arc<dyn ProfileStore>,
}

impl OutcomeReporter {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.store
    }

    /// Credit a solve. Abandoned and corrupt attempts are never reported.
    /// `None` when the user never registered.
    pub async fn report_solved(
        &self,
        user_id: &UserId,
        credit: i32,
    ) -> Result<Option<Profile>, ProfileError> {
        let updated = self
            .store
            .update(
                user_id,
                Box::new(move |profile| {
                    profile.solved_count += 1;
                    profile.cumulative_rating += i64::from(credit);
                }),
            )
            .await?;

        match &updated {
            Some(profile) => tracing::info!(
                user_id = %user_id,
                credit,
                solved_count = profile.solved_count,
                "Puzzle solved"
            ),
            None => tracing::debug!(user_id = %user_id, "Solved by unregistered user; nothing recorded"),
        }
        Ok(updated)
    }

    /// Overwrite the profile's tier on every selection.
    pub async fn record_tier_selected(
        &self,
        user_id: &UserId,
        tier: DifficultyTier,
    ) -> Result<Option<Profile>, ProfileError> {
        self.store
            .update(user_id, Box::new(move |profile| profile.current_tier = tier))
            .await
    }
}
