//! Final score persistence
//!
//! The session hands a `ScoreRecord` to a `ScoreStore` once per finished run.
//! `LocalScoreStore` keeps every run in LocalStorage (wasm32) and answers
//! per-user statistics and leaderboard queries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Game identifier stored with every record
pub const GAME_NAME: &str = "esquiva_islas";

/// Number of recent scores reported in `UserStats`
pub const RECENT_SCORES: usize = 5;

/// Payload saved when a run ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u64,
    /// Whole seconds played (frames / 60)
    pub duration_seconds: u64,
    pub game_name: String,
}

impl ScoreRecord {
    pub fn new(score: u64, duration_seconds: u64) -> Self {
        Self {
            score,
            duration_seconds,
            game_name: GAME_NAME.to_string(),
        }
    }
}

/// Why a save did not go through
#[derive(Debug)]
pub enum PersistError {
    /// No signed-in user to attribute the score to
    Unauthenticated,
    /// Backing storage unavailable or rejected the write
    Storage(String),
    Serialization(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Unauthenticated => write!(f, "no user signed in"),
            PersistError::Storage(msg) => write!(f, "storage error: {}", msg),
            PersistError::Serialization(e) => write!(f, "serialization error: {}", e),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Serialization(e)
    }
}

/// Anything that can accept a finished run's score
pub trait ScoreStore {
    fn save_score(&mut self, user_id: &str, record: &ScoreRecord) -> Result<(), PersistError>;
}

/// A stored run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub user_id: String,
    pub score: u64,
    pub duration_seconds: u64,
    pub game_name: String,
    /// Unix timestamp (ms) when saved
    pub timestamp: f64,
}

/// Aggregate statistics for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub highest_score: u64,
    pub total_games: usize,
    /// Mean score rounded to the nearest integer
    pub average_score: u64,
    /// Most recent scores, newest first
    pub last_scores: Vec<u64>,
}

/// Score history kept on the device
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalScoreStore {
    /// Oldest first
    pub entries: Vec<ScoreEntry>,
}

impl LocalScoreStore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "island_dodge_scores";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a run in memory without touching storage
    pub fn record(&mut self, user_id: &str, record: &ScoreRecord, timestamp: f64) {
        self.entries.push(ScoreEntry {
            user_id: user_id.to_string(),
            score: record.score,
            duration_seconds: record.duration_seconds,
            game_name: record.game_name.clone(),
            timestamp,
        });
    }

    /// Statistics over every run of `user_id`
    pub fn stats(&self, user_id: &str) -> UserStats {
        let scores: Vec<u64> = self
            .entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.score)
            .collect();

        if scores.is_empty() {
            return UserStats::default();
        }

        let total: u64 = scores.iter().sum();
        let average = (total as f64 / scores.len() as f64).round() as u64;

        UserStats {
            highest_score: scores.iter().copied().max().unwrap_or(0),
            total_games: scores.len(),
            average_score: average,
            last_scores: scores.iter().rev().take(RECENT_SCORES).copied().collect(),
        }
    }

    /// Best runs across all users for one game, highest first
    pub fn leaderboard(&self, game_name: &str, limit: usize) -> Vec<&ScoreEntry> {
        let mut best: Vec<&ScoreEntry> = self
            .entries
            .iter()
            .filter(|e| e.game_name == game_name)
            .collect();
        // Stable sort keeps earlier runs ahead on ties
        best.sort_by(|a, b| b.score.cmp(&a.score));
        best.truncate(limit);
        best
    }

    /// Load history from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<LocalScoreStore>(&json) {
                    Ok(store) => {
                        log::info!("Loaded {} stored scores", store.entries.len());
                        return store;
                    }
                    Err(e) => log::warn!("Discarding unreadable score history: {}", e),
                }
            }
        }

        log::info!("No score history found, starting fresh");
        Self::new()
    }

    /// Write history to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn persist(&self) -> Result<(), PersistError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistError::Storage("LocalStorage unavailable".to_string()))?;

        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| PersistError::Storage(format!("{:?}", e)))?;
        log::info!("Score history saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn persist(&self) -> Result<(), PersistError> {
        Ok(())
    }
}

impl ScoreStore for LocalScoreStore {
    fn save_score(&mut self, user_id: &str, record: &ScoreRecord) -> Result<(), PersistError> {
        if user_id.is_empty() {
            return Err(PersistError::Unauthenticated);
        }
        self.record_with(user_id, record, now_ms(), Self::persist)
    }
}

impl LocalScoreStore {
    /// Append a run and write it out, keeping the entry only if the write
    /// succeeds. A failed save can then be retried without double counting.
    fn record_with<W>(
        &mut self,
        user_id: &str,
        record: &ScoreRecord,
        timestamp: f64,
        write: W,
    ) -> Result<(), PersistError>
    where
        W: FnOnce(&Self) -> Result<(), PersistError>,
    {
        self.record(user_id, record, timestamp);
        if let Err(e) = write(self) {
            self.entries.pop();
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_carries_game_name() {
        let record = ScoreRecord::new(42, 25);
        assert_eq!(record.game_name, "esquiva_islas");
    }

    #[test]
    fn test_stats_for_unknown_user_are_zero() {
        let store = LocalScoreStore::new();
        assert_eq!(store.stats("nobody"), UserStats::default());
    }

    #[test]
    fn test_stats_aggregate() {
        let mut store = LocalScoreStore::new();
        for (i, score) in [10, 25, 7, 40, 12, 30].into_iter().enumerate() {
            store.record("ana", &ScoreRecord::new(score, 5), i as f64);
        }
        store.record("bo", &ScoreRecord::new(999, 5), 100.0);

        let stats = store.stats("ana");
        assert_eq!(stats.highest_score, 40);
        assert_eq!(stats.total_games, 6);
        // 124 / 6 = 20.67
        assert_eq!(stats.average_score, 21);
        assert_eq!(stats.last_scores, vec![30, 12, 40, 7, 25]);
    }

    #[test]
    fn test_leaderboard_sorted_and_limited() {
        let mut store = LocalScoreStore::new();
        store.record("a", &ScoreRecord::new(5, 1), 0.0);
        store.record("b", &ScoreRecord::new(50, 1), 1.0);
        store.record("c", &ScoreRecord::new(20, 1), 2.0);
        let top: Vec<u64> = store.leaderboard(GAME_NAME, 2).iter().map(|e| e.score).collect();
        assert_eq!(top, vec![50, 20]);
        assert!(store.leaderboard("other_game", 10).is_empty());
    }

    #[test]
    fn test_save_requires_user() {
        let mut store = LocalScoreStore::new();
        let err = store.save_score("", &ScoreRecord::new(1, 1)).unwrap_err();
        assert!(matches!(err, PersistError::Unauthenticated));
        assert!(store.is_empty());

        store.save_score("ana", &ScoreRecord::new(1, 1)).unwrap();
        assert_eq!(store.entries.len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_no_entry_behind() {
        let mut store = LocalScoreStore::new();
        let record = ScoreRecord::new(12, 2);
        let offline = |_: &LocalScoreStore| -> Result<(), PersistError> {
            Err(PersistError::Storage("quota exceeded".into()))
        };

        let err = store.record_with("ana", &record, 1.0, offline).unwrap_err();
        assert!(matches!(err, PersistError::Storage(_)));
        assert!(store.is_empty());

        // Retry of the same run counts it once
        let mut written = 0;
        store
            .record_with("ana", &record, 2.0, |s| {
                written = s.entries.len();
                Ok(())
            })
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(store.stats("ana").total_games, 1);
    }

    #[test]
    fn test_store_round_trips_through_json() {
        let mut store = LocalScoreStore::new();
        store.record("ana", &ScoreRecord::new(3, 2), 1.0);
        let json = serde_json::to_string(&store).unwrap();
        let back: LocalScoreStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, store.entries);
    }
}
