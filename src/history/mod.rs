//! Finished games and the queries run over them.

pub mod error;
pub mod service;
pub mod storage;
pub mod types;
pub mod validation;


pub use error::StoreError;
pub use service::HistoryService;
pub use storage::{GameStore, SeaOrmGameStore};
pub use types::{
    winner_index, CategoryBest, CategoryLeaders, DatabaseStats, GameFilter, GamePage,
    GameSession, GameSort, GameSummary, HighScoreCheck, HighScoreEntry, PlayerRecord,
    PlayerStatistics, SectionBest, SortOrder,
};
