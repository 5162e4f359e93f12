use chrono::{DateTime, Utc};

use crate::history::GameSession;

use super::dice::DiceSet;
use super::errors::GameError;
use super::player::Player;

/// An in-progress game: seated players, whose turn it is, and the shared dice.
#[derive(Clone, Debug)]
pub struct GameTable {
    players: Vec<Player>,
    current: usize,
    round: u32,
    pub dice: DiceSet,
    started_at: DateTime<Utc>,
}

impl GameTable {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(started_at: DateTime<Utc>) -> Self {
        Self {
            players: Vec::new(),
            current: 0,
            round: 1,
            dice: DiceSet::new(),
            started_at,
        }
    }

    pub fn add_player(&mut self, name: impl Into<String>) -> Result<&mut Player, GameError> {
        self.players.push(Player::new(name)?);
        let last = self.players.len() - 1;
        Ok(&mut self.players[last])
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current)
    }

    pub fn current_player_mut(&mut self) -> Option<&mut Player> {
        self.players.get_mut(self.current)
    }

    /// Passes the turn on; wrapping back to the first seat starts a new round.
    pub fn next_player(&mut self) -> Option<&Player> {
        if self.players.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.players.len();
        if self.current == 0 {
            self.round += 1;
        }
        self.players.get(self.current)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Snapshot the table as a completed session ready to be saved.
    pub fn finish(&self, notes: impl Into<String>) -> GameSession {
        GameSession::from_players_at(&self.players, notes, self.started_at, Utc::now())
    }
}

impl Default for GameTable {
    fn default() -> Self {
        Self::new()
    }
}
