use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{Player, ScoreCategory, Section};

/// One player's result as stored with a finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub final_score: u32,
    pub is_winner: bool,
    pub yellow_total: u32,
    pub green_total: u32,
    pub orange_total: u32,
    pub purple_total: u32,
    pub blue_total: u32,
    pub fox_count: u32,
    pub bonus: u32,
}

impl PlayerRecord {
    pub fn from_player(player: &Player) -> Self {
        let sheet = &player.sheet;
        Self {
            name: player.name().to_string(),
            final_score: sheet.total_score(),
            is_winner: false,
            yellow_total: sheet.section_total(Section::Yellow),
            green_total: sheet.section_total(Section::Green),
            orange_total: sheet.section_total(Section::Orange),
            purple_total: sheet.section_total(Section::Purple),
            blue_total: sheet.section_total(Section::Blue),
            fox_count: sheet.fox_count(),
            bonus: sheet.bonus_total(),
        }
    }

    pub fn section_total(&self, section: Section) -> u32 {
        match section {
            Section::Yellow => self.yellow_total,
            Section::Green => self.green_total,
            Section::Orange => self.orange_total,
            Section::Purple => self.purple_total,
            Section::Blue => self.blue_total,
        }
    }

    pub fn category_total(&self, category: ScoreCategory) -> u32 {
        match category.section() {
            Some(section) => self.section_total(section),
            None => self.bonus,
        }
    }
}

/// A completed game. `winner` indexes into `players`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub players: Vec<PlayerRecord>,
    pub winner: Option<usize>,
    pub notes: String,
}

impl GameSession {
    pub fn from_players(players: &[Player], notes: impl Into<String>) -> Self {
        let now = Utc::now();
        Self::from_players_at(players, notes, now, now)
    }

    pub fn from_players_at(
        players: &[Player],
        notes: impl Into<String>,
        created_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let mut records: Vec<PlayerRecord> = players.iter().map(PlayerRecord::from_player).collect();
        let winner = winner_index(records.iter().map(|record| record.final_score));
        if let Some(index) = winner {
            records[index].is_winner = true;
        }
        Self {
            id: Uuid::new_v4(),
            created_at,
            completed_at,
            players: records,
            winner,
            notes: notes.into(),
        }
    }

    pub fn winner(&self) -> Option<&PlayerRecord> {
        self.winner.and_then(|index| self.players.get(index))
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner().map(|record| record.name.as_str())
    }

    pub fn winner_score(&self) -> Option<u32> {
        self.winner().map(|record| record.final_score)
    }
}

/// Position of the strictly highest score; on a tie the earliest seat wins.
pub fn winner_index(scores: impl IntoIterator<Item = u32>) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (index, score) in scores.into_iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub game_id: Uuid,
    pub player_name: String,
    pub score: u32,
    pub achieved_at: DateTime<Utc>,
}

/// Row of the history list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub player_count: u32,
    pub winner_name: Option<String>,
    pub winner_score: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePage {
    pub games: Vec<GameSummary>,
    /// Number of games matching the filter across all pages.
    pub total: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameSort {
    Date(SortOrder),
    WinningScore(SortOrder),
    /// Always largest tables first.
    PlayerCount,
}

impl Default for GameSort {
    fn default() -> Self {
        GameSort::Date(SortOrder::Desc)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFilter {
    /// Case-insensitive substring of the winner or of any participant.
    pub query: Option<String>,
    /// Case-insensitive substring of any participant.
    pub player_name: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub sort: GameSort,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub total_games: u64,
    pub earliest_game: Option<DateTime<Utc>>,
    pub latest_game: Option<DateTime<Utc>>,
    pub average_winning_score: Option<f64>,
    pub highest_score: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBest {
    pub player_name: String,
    pub score: u32,
    pub game_id: Uuid,
    pub played_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLeaders {
    pub category: ScoreCategory,
    pub entries: Vec<SectionBest>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreCheck {
    pub qualifies: bool,
    /// Score currently holding the last ranked place; 0 while the table has free places.
    pub threshold: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBest {
    pub category: ScoreCategory,
    pub best: Option<u32>,
}

/// Aggregates over every stored record whose name contains the queried text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatistics {
    pub name_query: String,
    pub games_played: u64,
    pub games_won: u64,
    /// Percentage of matching records that won, 0 when nothing matched.
    pub win_rate: f64,
    pub best_score: Option<u32>,
    pub average_score: Option<f64>,
    pub best_by_category: Vec<CategoryBest>,
}
