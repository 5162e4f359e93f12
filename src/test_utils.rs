//! Fixtures shared by the store and service tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::DatabaseConnection;

use crate::db;
use crate::game::{Player, TRACK_LEN};
use crate::history::{GameSession, HistoryService};

pub const MEMORY_DB_URL: &str = "sqlite::memory:";

/// Fresh single-connection SQLite database with the schema in place.
pub async fn memory_db() -> anyhow::Result<DatabaseConnection> {
    Ok(db::connect_to(MEMORY_DB_URL).await?)
}

pub async fn memory_service() -> anyhow::Result<(HistoryService, DatabaseConnection)> {
    let conn = memory_db().await?;
    Ok((HistoryService::from_sea_orm(conn.clone()), conn))
}

/// Fixed reference instant so date filters are deterministic.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn days_after_epoch(days: i64) -> DateTime<Utc> {
    epoch() + Duration::days(days)
}

/// Player whose only points are orange values, so totals are easy to predict.
pub fn scored_player(name: &str, orange: &[u8]) -> Player {
    let mut player = Player::new(name).expect("fixture names are valid");
    for (slot, &value) in orange.iter().enumerate() {
        player.sheet.orange.set(slot, value);
    }
    player
}

/// Session played `day` days after the epoch, lasting one hour.
pub fn session_on(day: i64, players: &[Player]) -> GameSession {
    let created_at = days_after_epoch(day);
    GameSession::from_players_at(players, "", created_at, created_at + Duration::hours(1))
}

/// Two-player session whose winner scores `winning` and the runner-up scores 1.
pub fn duel_on(day: i64, winner: &str, winning: u8, loser: &str) -> GameSession {
    let players = [
        scored_player(winner, &spread(winning)),
        scored_player(loser, &[1]),
    ];
    session_on(day, &players)
}

// splits a score into orange values of at most six
fn spread(score: u8) -> Vec<u8> {
    debug_assert!(
        usize::from(score) <= TRACK_LEN * 6,
        "orange track cannot hold {score} points"
    );
    let mut left = score;
    let mut values = Vec::new();
    while left > 0 {
        let value = left.min(6);
        values.push(value);
        left -= value;
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duel_winner_scores_the_requested_total() {
        let full_track = (TRACK_LEN * 6) as u8;
        assert_eq!(spread(full_track).len(), TRACK_LEN);

        let session = duel_on(0, "Anna", full_track, "Bo");
        assert_eq!(session.winner_score(), Some(u32::from(full_track)));
        assert_eq!(session.players[1].final_score, 1);
    }

    #[test]
    #[should_panic(expected = "orange track cannot hold")]
    #[cfg(debug_assertions)]
    fn spread_rejects_scores_beyond_the_orange_track() {
        spread((TRACK_LEN * 6 + 1) as u8);
    }
}
