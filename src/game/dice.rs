use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const DIE_FACES: u8 = 6;

/// Process-wide generator shared by every [`DiceSet::roll`] call.
static DICE_RNG: Lazy<Mutex<StdRng>> = Lazy::new(|| Mutex::new(StdRng::seed_from_u64(clock_seed())));

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Yellow,
    Green,
    Orange,
    Purple,
    Blue,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Yellow,
        Color::Green,
        Color::Orange,
        Color::Purple,
        Color::Blue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Orange => "orange",
            Color::Purple => "purple",
            Color::Blue => "blue",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    pub color: Color,
    /// 0 until the die has been rolled, then 1..=6.
    pub value: u8,
}

impl Die {
    pub fn new(color: Color, value: u8) -> Self {
        Self { color, value }
    }

    pub fn is_rolled(&self) -> bool {
        self.value != 0
    }
}

/// The six colored dice of a session, one per [`Color`] in fixed order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSet {
    dice: Vec<Die>,
}

impl DiceSet {
    pub fn new() -> Self {
        Self {
            dice: Color::ALL.iter().map(|&color| Die::new(color, 0)).collect(),
        }
    }

    /// Roll every remaining die using the process-wide generator.
    pub fn roll(&mut self) {
        let mut rng = DICE_RNG.lock();
        self.roll_with(&mut *rng);
    }

    pub fn roll_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for die in &mut self.dice {
            die.value = rng.gen_range(1..=DIE_FACES);
        }
    }

    pub fn die(&self, color: Color) -> Option<&Die> {
        self.dice.iter().find(|die| die.color == color)
    }

    /// Dice showing a value strictly below `threshold`, in stored order.
    pub fn lower_dice(&self, threshold: u8) -> Vec<Die> {
        self.dice
            .iter()
            .filter(|die| die.value < threshold)
            .copied()
            .collect()
    }

    /// Removes the first die matching each entry's color and value.
    ///
    /// Entries with no matching die are skipped without any signal; callers that
    /// care whether a removal happened must inspect the set afterwards.
    pub fn remove_dice(&mut self, to_remove: &[Die]) {
        for target in to_remove {
            if let Some(index) = self.dice.iter().position(|die| die == target) {
                self.dice.remove(index);
            }
        }
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn iter(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter()
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }
}

impl Default for DiceSet {
    fn default() -> Self {
        Self::new()
    }
}
