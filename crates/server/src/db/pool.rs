use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run the Postgres schema migration inline.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Puzzle trainer progress, one row per platform user
CREATE TABLE IF NOT EXISTS puzzle_profiles (
    user_id           TEXT PRIMARY KEY,
    solved_count      BIGINT NOT NULL DEFAULT 0,
    cumulative_rating BIGINT NOT NULL DEFAULT 0,
    current_tier      TEXT NOT NULL DEFAULT 'medium',
    created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_puzzle_profiles_solved
    ON puzzle_profiles (solved_count DESC);
"#;
