use std::marker::PhantomData;

use serde::Serialize;

use super::scoring::{
    blue_score, bonus_score, green_score, orange_score, purple_score, yellow_score, Section,
    YellowGrid, MAX_ORANGE_VALUE, TRACK_LEN, YELLOW_COLUMNS, YELLOW_ROWS,
};

// Every area keeps its running total next to its marks. Mutators recompute it,
// so `total()` always agrees with the section's scoring rule.

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct YellowArea {
    columns: YellowGrid,
    total: u32,
}

impl YellowArea {
    pub fn columns(&self) -> &YellowGrid {
        &self.columns
    }

    pub fn is_marked(&self, column: usize, row: usize) -> bool {
        self.columns
            .get(column)
            .and_then(|cells| cells.get(row))
            .copied()
            .unwrap_or(false)
    }

    /// Out-of-range cells are ignored.
    pub fn set(&mut self, column: usize, row: usize, marked: bool) {
        if column < YELLOW_COLUMNS && row < YELLOW_ROWS {
            self.columns[column][row] = marked;
            self.total = yellow_score(&self.columns);
        }
    }

    pub fn toggle(&mut self, column: usize, row: usize) -> bool {
        let marked = !self.is_marked(column, row);
        self.set(column, row, marked);
        self.is_marked(column, row)
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

/// Scoring rule for an eleven-slot checkbox track.
pub trait TrackRule {
    const SECTION: Section;
    fn score(marks: &[bool]) -> u32;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GreenRule;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PurpleRule;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlueRule;

impl TrackRule for GreenRule {
    const SECTION: Section = Section::Green;

    fn score(marks: &[bool]) -> u32 {
        green_score(marks)
    }
}

impl TrackRule for PurpleRule {
    const SECTION: Section = Section::Purple;

    fn score(marks: &[bool]) -> u32 {
        purple_score(marks)
    }
}

impl TrackRule for BlueRule {
    const SECTION: Section = Section::Blue;

    fn score(marks: &[bool]) -> u32 {
        blue_score(marks)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrackArea<R> {
    marks: [bool; TRACK_LEN],
    total: u32,
    #[serde(skip)]
    rule: PhantomData<R>,
}

pub type GreenArea = TrackArea<GreenRule>;
pub type PurpleArea = TrackArea<PurpleRule>;
pub type BlueArea = TrackArea<BlueRule>;

impl<R: TrackRule> TrackArea<R> {
    pub fn section(&self) -> Section {
        R::SECTION
    }

    pub fn marks(&self) -> &[bool; TRACK_LEN] {
        &self.marks
    }

    pub fn is_marked(&self, slot: usize) -> bool {
        self.marks.get(slot).copied().unwrap_or(false)
    }

    pub fn marked_count(&self) -> usize {
        self.marks.iter().filter(|&&marked| marked).count()
    }

    /// Out-of-range slots are ignored.
    pub fn set(&mut self, slot: usize, marked: bool) {
        if let Some(cell) = self.marks.get_mut(slot) {
            *cell = marked;
            self.total = R::score(&self.marks);
        }
    }

    pub fn toggle(&mut self, slot: usize) -> bool {
        let marked = !self.is_marked(slot);
        self.set(slot, marked);
        self.is_marked(slot)
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

impl<R> Default for TrackArea<R> {
    fn default() -> Self {
        Self {
            marks: [false; TRACK_LEN],
            total: 0,
            rule: PhantomData,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OrangeArea {
    values: [u8; TRACK_LEN],
    total: u32,
}

impl OrangeArea {
    pub fn values(&self) -> &[u8; TRACK_LEN] {
        &self.values
    }

    pub fn value(&self, slot: usize) -> u8 {
        self.values.get(slot).copied().unwrap_or(0)
    }

    /// Stores a face value; 0 clears the slot and anything above six is capped.
    pub fn set(&mut self, slot: usize, value: u8) {
        if let Some(cell) = self.values.get_mut(slot) {
            *cell = value.min(MAX_ORANGE_VALUE);
            self.total = orange_score(&self.values);
        }
    }

    pub fn clear(&mut self, slot: usize) {
        self.set(slot, 0);
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BonusArea {
    fox_count: u32,
}

impl BonusArea {
    pub fn fox_count(&self) -> u32 {
        self.fox_count
    }

    /// Negative counts are treated as zero.
    pub fn set_fox_count(&mut self, count: i64) {
        self.fox_count = u32::try_from(count.max(0)).unwrap_or(u32::MAX);
    }

    pub fn add_fox(&mut self) {
        self.fox_count = self.fox_count.saturating_add(1);
    }

    pub fn remove_fox(&mut self) {
        self.fox_count = self.fox_count.saturating_sub(1);
    }
}

/// One player's sheet: five scored sections and the fox bonus.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScoreSheet {
    pub yellow: YellowArea,
    pub green: GreenArea,
    pub orange: OrangeArea,
    pub purple: PurpleArea,
    pub blue: BlueArea,
    pub bonus: BonusArea,
}

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section_total(&self, section: Section) -> u32 {
        match section {
            Section::Yellow => self.yellow.total(),
            Section::Green => self.green.total(),
            Section::Orange => self.orange.total(),
            Section::Purple => self.purple.total(),
            Section::Blue => self.blue.total(),
        }
    }

    pub fn section_totals(&self) -> [u32; 5] {
        Section::ALL.map(|section| self.section_total(section))
    }

    pub fn fox_count(&self) -> u32 {
        self.bonus.fox_count()
    }

    /// Derived from the current section totals on every call.
    pub fn bonus_total(&self) -> u32 {
        bonus_score(&self.section_totals(), self.bonus.fox_count())
    }

    /// Saturates instead of overflowing for absurd fox counts.
    pub fn total_score(&self) -> u32 {
        self.section_totals()
            .iter()
            .fold(self.bonus_total(), |total, &section| total.saturating_add(section))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
