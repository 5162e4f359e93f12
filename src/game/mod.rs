pub mod dice;
pub mod errors;
pub mod player;
pub mod scoring;
pub mod sheet;
pub mod table;

#[cfg(test)]
mod tests;

pub use dice::{Color, DiceSet, Die, DIE_FACES};
pub use errors::GameError;
pub use player::Player;
pub use scoring::{ScoreCategory, Section, TRACK_LEN, YELLOW_COLUMNS, YELLOW_ROWS};
pub use sheet::{
    BlueArea, BonusArea, GreenArea, OrangeArea, PurpleArea, ScoreSheet, TrackArea, YellowArea,
};
pub use table::GameTable;
