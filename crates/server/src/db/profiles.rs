use async_trait::async_trait;
use chess_puzzler::error::ProfileError;
use chess_puzzler::profile::{Profile, ProfileMutator, ProfileStore};
use chess_puzzler::puzzle::DifficultyTier;
use chess_puzzler::UserId;
use sqlx::PgPool;

/// Profile store backed by the `puzzle_profiles` table.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    user_id: String,
    solved_count: i64,
    cumulative_rating: i64,
    current_tier: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        let current_tier = self.current_tier.parse().unwrap_or_else(|_| {
            tracing::warn!(
                user_id = %self.user_id,
                tier = %self.current_tier,
                "Unknown tier stored for profile, using medium"
            );
            DifficultyTier::Medium
        });
        Profile {
            user_id: UserId::new(self.user_id),
            solved_count: self.solved_count,
            cumulative_rating: self.cumulative_rating,
            current_tier,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const PROFILE_COLUMNS: &str =
    "user_id, solved_count, cumulative_rating, current_tier, created_at, updated_at";

fn storage(e: sqlx::Error) -> ProfileError {
    ProfileError::Storage(e.to_string())
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM puzzle_profiles WHERE user_id = $1");
        let row: Option<ProfileRow> = sqlx::query_as(&query)
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        Ok(row.map(ProfileRow::into_profile))
    }

    async fn create_if_absent(&self, user_id: &UserId) -> Result<(Profile, bool), ProfileError> {
        let insert = format!(
            "INSERT INTO puzzle_profiles (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO NOTHING
             RETURNING {PROFILE_COLUMNS}"
        );
        let inserted: Option<ProfileRow> = sqlx::query_as(&insert)
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        if let Some(row) = inserted {
            return Ok((row.into_profile(), true));
        }

        let existing = self
            .get(user_id)
            .await?
            .ok_or_else(|| ProfileError::Storage(format!("profile {user_id} vanished after insert")))?;
        Ok((existing, false))
    }

    async fn update(
        &self,
        user_id: &UserId,
        mutator: ProfileMutator,
    ) -> Result<Option<Profile>, ProfileError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let select = format!(
            "SELECT {PROFILE_COLUMNS} FROM puzzle_profiles WHERE user_id = $1 FOR UPDATE"
        );
        let row: Option<ProfileRow> = sqlx::query_as(&select)
            .bind(user_id.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?;
        let Some(row) = row else {
            tx.rollback().await.map_err(storage)?;
            return Ok(None);
        };

        let mut profile = row.into_profile();
        mutator(&mut profile);

        let write = format!(
            "UPDATE puzzle_profiles
             SET solved_count = $2, cumulative_rating = $3, current_tier = $4, updated_at = NOW()
             WHERE user_id = $1
             RETURNING {PROFILE_COLUMNS}"
        );
        let row: ProfileRow = sqlx::query_as(&write)
            .bind(user_id.as_str())
            .bind(profile.solved_count)
            .bind(profile.cumulative_rating)
            .bind(profile.current_tier.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(storage)?;

        tx.commit().await.map_err(storage)?;
        Ok(Some(row.into_profile()))
    }
}
