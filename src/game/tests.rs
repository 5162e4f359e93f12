use super::scoring::*;
use super::sheet::ScoreSheet;
use super::table::GameTable;

fn track(marked: &[usize]) -> [bool; TRACK_LEN] {
    let mut marks = [false; TRACK_LEN];
    for &slot in marked {
        marks[slot] = true;
    }
    marks
}

fn complete_column(column: usize) -> YellowGrid {
    let mut grid = [[false; YELLOW_ROWS]; YELLOW_COLUMNS];
    grid[column] = [true; YELLOW_ROWS];
    grid
}

#[test]
fn yellow_single_complete_column_scores_its_square() {
    for column in 0..YELLOW_COLUMNS {
        let expected = ((column + 1) * (column + 1)) as u32;
        assert_eq!(yellow_score(&complete_column(column)), expected, "column {column}");
    }
}

#[test]
fn yellow_partial_columns_score_nothing() {
    let mut grid = complete_column(2);
    grid[2][5] = false;
    grid[4] = [true, true, true, true, true, false];
    assert_eq!(yellow_score(&grid), 0);
}

#[test]
fn yellow_columns_add_independently() {
    let mut grid = complete_column(0);
    grid[5] = [true; YELLOW_ROWS];
    assert_eq!(yellow_score(&grid), 1 + 36);
    assert_eq!(yellow_score(&[[true; YELLOW_ROWS]; YELLOW_COLUMNS]), 91);
}

#[test]
fn green_scores_squared_runs() {
    let marks = [
        true, true, false, true, true, true, false, false, false, false, false,
    ];
    assert_eq!(green_score(&marks), 4 + 9);
}

#[test]
fn green_isolated_marks_and_trailing_run() {
    assert_eq!(green_score(&track(&[0, 2, 4])), 3);
    assert_eq!(green_score(&track(&[8, 9, 10])), 9);
    assert_eq!(green_score(&[true; TRACK_LEN]), 121);
    assert_eq!(green_score(&[false; TRACK_LEN]), 0);
}

#[test]
fn orange_sums_entered_values() {
    let values = [3, 0, 6, 0, 0, 0, 0, 0, 0, 0, 2];
    assert_eq!(orange_score(&values), 11);
    assert_eq!(orange_score(&[0; TRACK_LEN]), 0);
}

#[test]
fn purple_maps_slot_index_to_points() {
    assert_eq!(purple_score(&track(&[5])), 6);
    assert_eq!(purple_score(&track(&[0, 10])), 1 + 11);
    assert_eq!(purple_score(&[true; TRACK_LEN]), 66);
}

#[test]
fn blue_follows_triangular_table() {
    let table = [0, 1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 66];
    for (count, &expected) in table.iter().enumerate() {
        let slots: Vec<usize> = (0..count).collect();
        assert_eq!(blue_score(&track(&slots)), expected, "count {count}");
    }
    for pair in table.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn blue_ignores_which_slots_are_marked() {
    assert_eq!(blue_score(&track(&[0, 1, 2, 3])), 10);
    assert_eq!(blue_score(&track(&[1, 4, 7, 10])), 10);
}

#[test]
fn bonus_uses_lowest_nonzero_section() {
    assert_eq!(bonus_score(&[10, 0, 5, 20, 0], 3), 15);
    assert_eq!(bonus_score(&[0, 0, 0, 0, 0], 4), 0);
    assert_eq!(bonus_score(&[7, 9, 12, 3, 40], 0), 0);
}

#[test]
fn sheet_totals_track_every_mutation() {
    let mut sheet = ScoreSheet::new();
    for row in 0..YELLOW_ROWS {
        sheet.yellow.set(2, row, true);
    }
    assert_eq!(sheet.yellow.total(), 9);

    sheet.green.set(0, true);
    sheet.green.set(1, true);
    assert_eq!(sheet.green.total(), 4);

    sheet.orange.set(0, 3);
    sheet.orange.set(4, 6);
    assert_eq!(sheet.orange.total(), 9);

    sheet.purple.set(5, true);
    assert_eq!(sheet.purple.total(), 6);

    sheet.bonus.set_fox_count(2);
    // lowest non-zero section is green (4), blue is untouched
    assert_eq!(sheet.bonus_total(), 8);
    assert_eq!(sheet.total_score(), 9 + 4 + 9 + 6 + 8);

    sheet.yellow.toggle(2, 0);
    assert_eq!(sheet.yellow.total(), 0);
    sheet.orange.clear(4);
    assert_eq!(sheet.orange.total(), 3);
    // orange (3) is now the lowest section
    assert_eq!(sheet.bonus_total(), 6);
    assert_eq!(sheet.total_score(), 4 + 3 + 6 + 6);
}

#[test]
fn sheet_guards_out_of_range_and_invalid_input() {
    let mut sheet = ScoreSheet::new();
    sheet.yellow.set(6, 0, true);
    sheet.green.set(TRACK_LEN, true);
    sheet.orange.set(TRACK_LEN, 4);
    assert_eq!(sheet, ScoreSheet::new());

    sheet.orange.set(1, 9);
    assert_eq!(sheet.orange.value(1), 6);

    sheet.bonus.set_fox_count(-3);
    assert_eq!(sheet.fox_count(), 0);
    sheet.bonus.remove_fox();
    assert_eq!(sheet.fox_count(), 0);
    sheet.bonus.add_fox();
    assert_eq!(sheet.fox_count(), 1);
}

#[test]
fn section_totals_follow_section_order() {
    let mut sheet = ScoreSheet::new();
    sheet.blue.set(0, true);
    sheet.blue.set(1, true);
    sheet.orange.set(3, 2);
    assert_eq!(sheet.section_totals(), [0, 0, 2, 0, 3]);
    assert_eq!(sheet.section_total(Section::Blue), 3);
    assert_eq!(sheet.blue.section(), Section::Blue);

    sheet.reset();
    assert_eq!(sheet.total_score(), 0);
}

#[test]
fn table_rotates_players_and_counts_rounds() {
    let mut table = GameTable::new();
    assert!(table.next_player().is_none());
    assert_eq!(table.round(), 1);

    table.add_player("Ann").unwrap();
    table.add_player("Bo").unwrap();
    table.add_player("Cy").unwrap();
    assert!(table.add_player(" ").is_err());
    assert_eq!(table.players().len(), 3);

    assert_eq!(table.current_player().map(|p| p.name()), Some("Ann"));
    assert_eq!(table.next_player().map(|p| p.name()), Some("Bo"));
    assert_eq!(table.next_player().map(|p| p.name()), Some("Cy"));
    assert_eq!(table.round(), 1);
    assert_eq!(table.next_player().map(|p| p.name()), Some("Ann"));
    assert_eq!(table.round(), 2);
}

#[test]
fn finishing_a_table_picks_the_first_highest_scorer() {
    let mut table = GameTable::new();
    table.add_player("Ann").unwrap().sheet.orange.set(0, 4);
    table.add_player("Bo").unwrap().sheet.orange.set(0, 6);
    table.add_player("Cy").unwrap().sheet.orange.set(0, 6);

    let session = table.finish("close one");
    assert_eq!(session.created_at, table.start_time());
    assert!(session.completed_at >= session.created_at);
    assert_eq!(session.notes, "close one");

    let winner = session.winner().unwrap();
    assert_eq!(winner.name, "Bo");
    assert_eq!(
        session.players.iter().filter(|p| p.is_winner).count(),
        1
    );
}

#[test]
fn huge_fox_counts_saturate_instead_of_overflowing() {
    assert_eq!(bonus_score(&[6, 0, 0, 0, 0], u32::MAX), u32::MAX);

    let mut sheet = ScoreSheet::new();
    sheet.orange.set(0, 6);
    sheet.bonus.set_fox_count(1_000_000_000);
    assert_eq!(sheet.bonus_total(), u32::MAX);
    assert_eq!(sheet.total_score(), u32::MAX);

    sheet.bonus.set_fox_count(i64::MAX);
    assert_eq!(sheet.fox_count(), u32::MAX);
    assert_eq!(sheet.total_score(), u32::MAX);
}
