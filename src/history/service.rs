use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::tokio_tools::spawn_named_task;

use super::error::StoreError;
use super::storage::{GameStore, SeaOrmGameStore};
use super::types::{
    CategoryLeaders, DatabaseStats, GameFilter, GamePage, GameSession, HighScoreCheck,
    HighScoreEntry, PlayerStatistics,
};
use super::validation::{
    cutoff_months_ago, validate_date_range, validate_filter, validate_limit,
    validate_player_name, validate_score_threshold, validate_session,
};

const LOG_TARGET: &str = "clever_scorer::history";

/// Entry point for everything that reads or writes finished games.
///
/// Validates arguments before they reach the store and logs every failure
/// under the name of the operation that produced it.
#[derive(Clone)]
pub struct HistoryService {
    store: Arc<dyn GameStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    pub fn from_sea_orm(connection: DatabaseConnection) -> Self {
        let store = Arc::new(SeaOrmGameStore::new(connection)) as Arc<dyn GameStore>;
        Self::new(store)
    }

    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    pub async fn save_game(&self, session: &GameSession) -> Result<(), StoreError> {
        logged("save game", async {
            validate_session(session)?;
            self.store.save_game(session).await
        })
        .await
    }

    /// Saves on a background task; the outcome is delivered through the handle.
    pub fn spawn_save(&self, session: GameSession) -> JoinHandle<Result<(), StoreError>> {
        let service = self.clone();
        spawn_named_task("save_game", async move { service.save_game(&session).await })
    }

    pub async fn game_by_id(&self, id: Uuid) -> Result<GameSession, StoreError> {
        logged("load game", self.store.game_by_id(id)).await
    }

    pub async fn games(
        &self,
        filter: &GameFilter,
        limit: u64,
        offset: u64,
    ) -> Result<GamePage, StoreError> {
        logged("list games", async {
            validate_filter(filter)?;
            validate_limit(limit)?;
            self.store.games(filter, limit, offset).await
        })
        .await
    }

    pub async fn delete_game(&self, id: Uuid) -> Result<(), StoreError> {
        logged("delete game", self.store.delete_game(id)).await?;
        info!(target: LOG_TARGET, game = %id, "deleted game");
        Ok(())
    }

    pub async fn database_stats(&self) -> Result<DatabaseStats, StoreError> {
        logged("load database statistics", self.store.database_stats()).await
    }

    pub async fn delete_old_games(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let removed = logged("delete old games", self.store.delete_old_games(cutoff)).await?;
        info!(target: LOG_TARGET, %cutoff, removed, "deleted games created before cutoff");
        Ok(removed)
    }

    pub async fn delete_games_older_than_months(&self, months: u32) -> Result<u64, StoreError> {
        let cutoff = logged("delete old games", async { cutoff_months_ago(months, Utc::now()) })
            .await?;
        self.delete_old_games(cutoff).await
    }

    pub async fn delete_low_scoring_games(&self, threshold: u32) -> Result<u64, StoreError> {
        let removed = logged("delete low scoring games", async {
            validate_score_threshold(threshold)?;
            self.store.delete_low_scoring_games(threshold).await
        })
        .await?;
        info!(target: LOG_TARGET, threshold, removed, "deleted games below score threshold");
        Ok(removed)
    }

    pub async fn delete_games_in_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let removed = logged("delete games in date range", async {
            validate_date_range(start, end)?;
            self.store.delete_games_in_date_range(start, end).await
        })
        .await?;
        info!(target: LOG_TARGET, %start, %end, removed, "deleted games in date range");
        Ok(removed)
    }

    pub async fn high_scores(&self, limit: u64) -> Result<Vec<HighScoreEntry>, StoreError> {
        logged("load high scores", async {
            validate_limit(limit)?;
            self.store.high_scores(limit).await
        })
        .await
    }

    pub async fn player_high_scores(
        &self,
        name: &str,
        limit: u64,
    ) -> Result<Vec<HighScoreEntry>, StoreError> {
        logged("load player high scores", async {
            validate_player_name(name)?;
            validate_limit(limit)?;
            self.store.player_high_scores(name.trim(), limit).await
        })
        .await
    }

    pub async fn best_section_scores(
        &self,
        limit: u64,
    ) -> Result<Vec<CategoryLeaders>, StoreError> {
        logged("load best section scores", async {
            validate_limit(limit)?;
            self.store.best_section_scores(limit).await
        })
        .await
    }

    pub async fn is_high_score(&self, score: u32, limit: u64) -> Result<HighScoreCheck, StoreError> {
        logged("check high score", async {
            validate_limit(limit)?;
            self.store.is_high_score(score, limit).await
        })
        .await
    }

    pub async fn player_statistics(&self, name: &str) -> Result<PlayerStatistics, StoreError> {
        logged("load player statistics", async {
            validate_player_name(name)?;
            self.store.player_statistics(name.trim()).await
        })
        .await
    }
}

async fn logged<T, F>(operation: &'static str, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let result = fut.await;
    if let Err(err) = &result {
        match err {
            StoreError::Database(_) => {
                error!(target: LOG_TARGET, operation, error = %err, "store operation failed")
            }
            StoreError::Validation(_) | StoreError::NotFound(_) => {
                warn!(target: LOG_TARGET, operation, error = %err, "store operation rejected")
            }
        }
    }
    result
}
