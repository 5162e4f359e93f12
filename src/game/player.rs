use serde::Serialize;

use super::errors::GameError;
use super::sheet::ScoreSheet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Player {
    name: String,
    pub sheet: ScoreSheet,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Result<Self, GameError> {
        Ok(Self {
            name: normalize_name(name.into())?,
            sheet: ScoreSheet::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Empty names are rejected and the current name is kept.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), GameError> {
        self.name = normalize_name(name.into())?;
        Ok(())
    }

    pub fn total_score(&self) -> u32 {
        self.sheet.total_score()
    }

    pub fn score_text(&self) -> String {
        format!("{}: {} points", self.name, self.total_score())
    }
}

fn normalize_name(name: String) -> Result<String, GameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GameError::EmptyName);
    }
    Ok(trimmed.to_string())
}
