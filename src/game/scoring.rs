//! Section scoring rules.
//!
//! Each rule is a pure function from a section's marks to its point total.
//! The scoresheet areas call into these after every mutation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::dice::Color;

pub const YELLOW_COLUMNS: usize = 6;
pub const YELLOW_ROWS: usize = 6;
/// Slot count of the green, orange, purple and blue tracks.
pub const TRACK_LEN: usize = 11;
pub const MAX_ORANGE_VALUE: u8 = 6;

/// Yellow marks indexed as `[column][row]`.
pub type YellowGrid = [[bool; YELLOW_ROWS]; YELLOW_COLUMNS];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Yellow,
    Green,
    Orange,
    Purple,
    Blue,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Yellow,
        Section::Green,
        Section::Orange,
        Section::Purple,
        Section::Blue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Yellow => "yellow",
            Section::Green => "green",
            Section::Orange => "orange",
            Section::Purple => "purple",
            Section::Blue => "blue",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Section::Yellow => Color::Yellow,
            Section::Green => Color::Green,
            Section::Orange => Color::Orange,
            Section::Purple => Color::Purple,
            Section::Blue => Color::Blue,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A section or the fox bonus; the categories ranked in best-score reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Yellow,
    Green,
    Orange,
    Purple,
    Blue,
    Bonus,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 6] = [
        ScoreCategory::Yellow,
        ScoreCategory::Green,
        ScoreCategory::Orange,
        ScoreCategory::Purple,
        ScoreCategory::Blue,
        ScoreCategory::Bonus,
    ];

    pub fn section(self) -> Option<Section> {
        match self {
            ScoreCategory::Yellow => Some(Section::Yellow),
            ScoreCategory::Green => Some(Section::Green),
            ScoreCategory::Orange => Some(Section::Orange),
            ScoreCategory::Purple => Some(Section::Purple),
            ScoreCategory::Blue => Some(Section::Blue),
            ScoreCategory::Bonus => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self.section() {
            Some(section) => section.as_str(),
            None => "bonus",
        }
    }
}

impl From<Section> for ScoreCategory {
    fn from(section: Section) -> Self {
        match section {
            Section::Yellow => ScoreCategory::Yellow,
            Section::Green => ScoreCategory::Green,
            Section::Orange => ScoreCategory::Orange,
            Section::Purple => ScoreCategory::Purple,
            Section::Blue => ScoreCategory::Blue,
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column `c` (1-indexed) is worth `c²` once all six of its cells are marked.
pub fn yellow_score(grid: &YellowGrid) -> u32 {
    grid.iter()
        .zip(1u32..)
        .filter(|(column, _)| column.iter().all(|&marked| marked))
        .map(|(_, number)| number * number)
        .sum()
}

/// Sum of squared lengths of the maximal runs of marked slots.
pub fn green_score(marks: &[bool]) -> u32 {
    let mut score = 0;
    let mut run = 0u32;
    for &marked in marks {
        if marked {
            run += 1;
        } else {
            score += run * run;
            run = 0;
        }
    }
    score + run * run
}

/// Plain sum of the entered values; 0 marks an empty slot.
pub fn orange_score(values: &[u8]) -> u32 {
    values.iter().map(|&value| u32::from(value)).sum()
}

/// Slot `i` (0-indexed) is worth `i + 1` regardless of the order it was marked in.
pub fn purple_score(marks: &[bool]) -> u32 {
    marks
        .iter()
        .zip(1u32..)
        .filter(|(&marked, _)| marked)
        .map(|(_, points)| points)
        .sum()
}

/// Only the number of marks matters: `n` marks score `T(n) = n(n+1)/2`.
pub fn blue_score(marks: &[bool]) -> u32 {
    let count = marks.iter().filter(|&&marked| marked).count() as u32;
    triangular(count)
}

pub fn triangular(n: u32) -> u32 {
    n * (n + 1) / 2
}

/// Lowest strictly-positive section total times the fox count.
///
/// Untouched sections (total 0) never drag the multiplier down; with every
/// section at 0 the bonus is 0. Saturates at `u32::MAX`.
pub fn bonus_score(section_totals: &[u32], fox_count: u32) -> u32 {
    section_totals
        .iter()
        .copied()
        .filter(|&total| total > 0)
        .min()
        .unwrap_or(0)
        .saturating_mul(fox_count)
}
