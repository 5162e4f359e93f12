use chrono::{DateTime, Months, Utc};

use super::error::StoreError;
use super::types::{GameFilter, GameSession};

pub fn validate_player_name(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::validation("player name must not be empty"));
    }
    Ok(())
}

pub fn validate_limit(limit: u64) -> Result<(), StoreError> {
    if limit == 0 {
        return Err(StoreError::validation("limit must be greater than zero"));
    }
    Ok(())
}

pub fn validate_score_threshold(threshold: u32) -> Result<(), StoreError> {
    if threshold == 0 {
        return Err(StoreError::validation(
            "score threshold must be greater than zero",
        ));
    }
    Ok(())
}

pub fn validate_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), StoreError> {
    if start > end {
        return Err(StoreError::validation(format!(
            "date range start {start} is after end {end}"
        )));
    }
    Ok(())
}

pub fn validate_filter(filter: &GameFilter) -> Result<(), StoreError> {
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
        validate_date_range(from, to)?;
    }
    Ok(())
}

pub fn validate_session(session: &GameSession) -> Result<(), StoreError> {
    for record in &session.players {
        validate_player_name(&record.name)?;
    }
    if session.completed_at < session.created_at {
        return Err(StoreError::validation(
            "game cannot complete before it was created",
        ));
    }
    let winners = session.players.iter().filter(|p| p.is_winner).count();
    let expected = usize::from(!session.players.is_empty());
    if winners != expected || session.winner.is_some() != (expected == 1) {
        return Err(StoreError::validation(format!(
            "expected {expected} winner(s), found {winners}"
        )));
    }
    if let Some(index) = session.winner {
        if !session.players.get(index).is_some_and(|p| p.is_winner) {
            return Err(StoreError::validation("winner index does not match records"));
        }
    }
    Ok(())
}

/// Point in time `months` calendar months before `now`.
pub fn cutoff_months_ago(months: u32, now: DateTime<Utc>) -> Result<DateTime<Utc>, StoreError> {
    if months == 0 {
        return Err(StoreError::validation("months must be greater than zero"));
    }
    now.checked_sub_months(Months::new(months))
        .ok_or_else(|| StoreError::validation(format!("{months} months is out of range")))
}
