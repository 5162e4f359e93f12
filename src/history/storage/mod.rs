use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::StoreError;
use super::types::{
    CategoryLeaders, DatabaseStats, GameFilter, GamePage, GameSession, HighScoreCheck,
    HighScoreEntry, PlayerStatistics,
};

pub mod sea_orm;

pub use self::sea_orm::SeaOrmGameStore;

/// Persistent record of finished games.
///
/// Implementations trust their inputs; boundary checks live in
/// [`crate::history::HistoryService`].
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Stores the game, its players and the winner's high score atomically.
    async fn save_game(&self, session: &GameSession) -> Result<(), StoreError>;

    /// Players come back ordered by final score, highest first.
    async fn game_by_id(&self, id: Uuid) -> Result<GameSession, StoreError>;

    async fn games(
        &self,
        filter: &GameFilter,
        limit: u64,
        offset: u64,
    ) -> Result<GamePage, StoreError>;

    async fn delete_game(&self, id: Uuid) -> Result<(), StoreError>;

    async fn database_stats(&self) -> Result<DatabaseStats, StoreError>;

    /// Removes games created strictly before `cutoff`; returns how many went.
    async fn delete_old_games(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Removes games whose winning score is strictly below `threshold`.
    async fn delete_low_scoring_games(&self, threshold: u32) -> Result<u64, StoreError>;

    /// Removes games created within `[start, end]`.
    async fn delete_games_in_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    async fn high_scores(&self, limit: u64) -> Result<Vec<HighScoreEntry>, StoreError>;

    async fn player_high_scores(
        &self,
        name: &str,
        limit: u64,
    ) -> Result<Vec<HighScoreEntry>, StoreError>;

    async fn best_section_scores(&self, limit: u64) -> Result<Vec<CategoryLeaders>, StoreError>;

    async fn is_high_score(&self, score: u32, limit: u64) -> Result<HighScoreCheck, StoreError>;

    async fn player_statistics(&self, name: &str) -> Result<PlayerStatistics, StoreError>;
}
