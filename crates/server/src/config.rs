use std::env;
use std::time::Duration;

use chess_puzzler::catalog::PUZZLES_FILE_PATH;

#[derive(Clone, Debug)]
pub struct Config {
    /// Profiles are kept in memory when unset.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub puzzles_path: String,
    /// Idle time after which a session slot is dropped. `None` disables eviction.
    pub session_idle_ttl: Option<Duration>,
    pub eviction_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(var: F) -> Self {
        let idle_secs: u64 = var("SESSION_IDLE_TTL_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        Self {
            database_url: var("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT").and_then(|v| v.parse().ok()).unwrap_or(8000),
            puzzles_path: var("PUZZLES_PATH").unwrap_or_else(|| PUZZLES_FILE_PATH.to_string()),
            session_idle_ttl: (idle_secs > 0).then(|| Duration::from_secs(idle_secs)),
            eviction_interval: Duration::from_secs(
                var("EVICTION_INTERVAL_SECS")
                    .and_then(|v| v.parse().ok())
                    .filter(|&secs: &u64| secs > 0)
                    .unwrap_or(300),
            ),
        }
    }
}
