use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, LikeExpr, Query, SelectStatement, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::db::entity::{games, high_scores, players};
use crate::game::ScoreCategory;
use crate::history::error::StoreError;
use crate::history::types::{
    CategoryBest, CategoryLeaders, DatabaseStats, GameFilter, GamePage, GameSession, GameSort,
    GameSummary, HighScoreCheck, HighScoreEntry, PlayerRecord, PlayerStatistics, SectionBest,
    SortOrder,
};

use super::GameStore;

const LOG_TARGET: &str = "clever_scorer::history::store";

pub struct SeaOrmGameStore {
    connection: DatabaseConnection,
}

impl SeaOrmGameStore {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    async fn ranked_high_scores(
        &self,
        name: Option<&str>,
        limit: u64,
    ) -> Result<Vec<HighScoreEntry>, StoreError> {
        let mut select = high_scores::Entity::find();
        if let Some(name) = name {
            select = select.filter(name_contains(high_scores::Column::PlayerNameFolded, name));
        }
        let rows = select
            .find_also_related(games::Entity)
            .order_by_desc(high_scores::Column::Score)
            .order_by_asc(high_scores::Column::AchievedAt)
            .order_by_asc(high_scores::Column::Id)
            .limit(limit)
            .all(&self.connection)
            .await?;

        rows.into_iter()
            .map(|(entry, game)| {
                let game = game.ok_or_else(|| orphaned("high score"))?;
                Ok(HighScoreEntry {
                    game_id: parse_uuid(&game.uuid)?,
                    player_name: entry.player_name,
                    score: from_db_int(entry.score),
                    achieved_at: entry.achieved_at,
                })
            })
            .collect()
    }

    /// Deletes every game matching `condition` with its players and high scores in one transaction.
    async fn delete_games_matching(
        &self,
        condition: Condition,
        reason: &'static str,
    ) -> Result<u64, StoreError> {
        let txn = self.connection.begin().await?;
        let ids: Vec<i32> = games::Entity::find()
            .select_only()
            .column(games::Column::Id)
            .filter(condition)
            .into_tuple()
            .all(&txn)
            .await?;
        if ids.is_empty() {
            debug!(target: LOG_TARGET, reason, "no games matched bulk delete");
            return Ok(0);
        }

        let scores = high_scores::Entity::delete_many()
            .filter(high_scores::Column::GameId.is_in(ids.clone()))
            .exec(&txn)
            .await?;
        let seats = players::Entity::delete_many()
            .filter(players::Column::GameId.is_in(ids.clone()))
            .exec(&txn)
            .await?;
        let removed = games::Entity::delete_many()
            .filter(games::Column::Id.is_in(ids))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        debug!(
            target: LOG_TARGET,
            reason,
            games = removed.rows_affected,
            players = seats.rows_affected,
            high_scores = scores.rows_affected,
            "bulk delete committed"
        );
        Ok(removed.rows_affected)
    }
}

#[async_trait]
impl GameStore for SeaOrmGameStore {
    async fn save_game(&self, session: &GameSession) -> Result<(), StoreError> {
        let player_count = i32::try_from(session.players.len())
            .map_err(|_| StoreError::validation("too many players"))?;
        let winner_score = session
            .winner_score()
            .map(|score| to_db_int(score, "winner score"))
            .transpose()?;

        let txn = self.connection.begin().await?;
        let game = games::ActiveModel {
            uuid: Set(session.id.to_string()),
            created_at: Set(session.created_at),
            completed_at: Set(session.completed_at),
            player_count: Set(player_count),
            winner_name: Set(session.winner_name().map(str::to_owned)),
            winner_name_folded: Set(session.winner_name().map(fold_name)),
            winner_score: Set(winner_score),
            notes: Set(session.notes.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for record in &session.players {
            players::ActiveModel {
                game_id: Set(game.id),
                name: Set(record.name.clone()),
                name_folded: Set(fold_name(&record.name)),
                final_score: Set(to_db_int(record.final_score, "final score")?),
                winner: Set(record.is_winner),
                yellow_total: Set(to_db_int(record.yellow_total, "yellow total")?),
                green_total: Set(to_db_int(record.green_total, "green total")?),
                orange_total: Set(to_db_int(record.orange_total, "orange total")?),
                purple_total: Set(to_db_int(record.purple_total, "purple total")?),
                blue_total: Set(to_db_int(record.blue_total, "blue total")?),
                fox_count: Set(to_db_int(record.fox_count, "fox count")?),
                bonus: Set(to_db_int(record.bonus, "bonus")?),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        if let (Some(winner), Some(score)) = (session.winner(), winner_score) {
            high_scores::ActiveModel {
                game_id: Set(game.id),
                player_name: Set(winner.name.clone()),
                player_name_folded: Set(fold_name(&winner.name)),
                score: Set(score),
                achieved_at: Set(session.completed_at),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        debug!(
            target: LOG_TARGET,
            game = %session.id,
            row_id = game.id,
            players = session.players.len(),
            "game saved"
        );
        Ok(())
    }

    async fn game_by_id(&self, id: Uuid) -> Result<GameSession, StoreError> {
        let game = games::Entity::find()
            .filter(games::Column::Uuid.eq(id.to_string()))
            .one(&self.connection)
            .await?
            .ok_or(StoreError::NotFound("game"))?;

        let records: Vec<PlayerRecord> = players::Entity::find()
            .filter(players::Column::GameId.eq(game.id))
            .order_by_desc(players::Column::FinalScore)
            .order_by_asc(players::Column::Id)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(player_record)
            .collect();
        let winner = records.iter().position(|record| record.is_winner);

        Ok(GameSession {
            id,
            created_at: game.created_at,
            completed_at: game.completed_at,
            players: records,
            winner,
            notes: game.notes,
        })
    }

    async fn games(
        &self,
        filter: &GameFilter,
        limit: u64,
        offset: u64,
    ) -> Result<GamePage, StoreError> {
        let select = filtered_games(filter);
        let total = select.clone().count(&self.connection).await?;

        let select = match filter.sort {
            GameSort::Date(order) => {
                select.order_by(games::Column::CreatedAt, sea_order(order))
            }
            GameSort::WinningScore(order) => select
                .order_by(games::Column::WinnerScore, sea_order(order))
                .order_by_desc(games::Column::CreatedAt),
            GameSort::PlayerCount => select
                .order_by_desc(games::Column::PlayerCount)
                .order_by_desc(games::Column::CreatedAt),
        };
        let games = select
            .order_by_asc(games::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(game_summary)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GamePage { games, total })
    }

    async fn delete_game(&self, id: Uuid) -> Result<(), StoreError> {
        let txn = self.connection.begin().await?;
        let game = games::Entity::find()
            .filter(games::Column::Uuid.eq(id.to_string()))
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound("game"))?;

        high_scores::Entity::delete_many()
            .filter(high_scores::Column::GameId.eq(game.id))
            .exec(&txn)
            .await?;
        players::Entity::delete_many()
            .filter(players::Column::GameId.eq(game.id))
            .exec(&txn)
            .await?;
        games::Entity::delete_by_id(game.id).exec(&txn).await?;
        txn.commit().await?;

        debug!(target: LOG_TARGET, game = %id, "game deleted");
        Ok(())
    }

    async fn database_stats(&self) -> Result<DatabaseStats, StoreError> {
        let total_games = games::Entity::find().count(&self.connection).await?;
        let earliest_game = games::Entity::find()
            .order_by_asc(games::Column::CreatedAt)
            .one(&self.connection)
            .await?
            .map(|game| game.created_at);
        let latest_game = games::Entity::find()
            .order_by_desc(games::Column::CreatedAt)
            .one(&self.connection)
            .await?
            .map(|game| game.created_at);

        let (score_sum, scored, highest): (Option<i64>, i64, Option<i32>) = games::Entity::find()
            .select_only()
            .column_as(games::Column::WinnerScore.sum(), "score_sum")
            .column_as(games::Column::WinnerScore.count(), "scored")
            .column_as(games::Column::WinnerScore.max(), "highest")
            .into_tuple()
            .one(&self.connection)
            .await?
            .unwrap_or((None, 0, None));

        let average_winning_score = match score_sum {
            Some(sum) if scored > 0 => Some(sum as f64 / scored as f64),
            _ => None,
        };

        Ok(DatabaseStats {
            total_games,
            earliest_game,
            latest_game,
            average_winning_score,
            highest_score: highest.map(from_db_int),
        })
    }

    async fn delete_old_games(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let condition = Condition::all().add(games::Column::CreatedAt.lt(cutoff));
        self.delete_games_matching(condition, "older than cutoff")
            .await
    }

    async fn delete_low_scoring_games(&self, threshold: u32) -> Result<u64, StoreError> {
        let threshold = to_db_int(threshold, "score threshold")?;
        let condition = Condition::all().add(games::Column::WinnerScore.lt(threshold));
        self.delete_games_matching(condition, "below score threshold")
            .await
    }

    async fn delete_games_in_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let condition = Condition::all()
            .add(games::Column::CreatedAt.gte(start))
            .add(games::Column::CreatedAt.lte(end));
        self.delete_games_matching(condition, "inside date range")
            .await
    }

    async fn high_scores(&self, limit: u64) -> Result<Vec<HighScoreEntry>, StoreError> {
        self.ranked_high_scores(None, limit).await
    }

    async fn player_high_scores(
        &self,
        name: &str,
        limit: u64,
    ) -> Result<Vec<HighScoreEntry>, StoreError> {
        self.ranked_high_scores(Some(name), limit).await
    }

    async fn best_section_scores(&self, limit: u64) -> Result<Vec<CategoryLeaders>, StoreError> {
        let mut leaders = Vec::with_capacity(ScoreCategory::ALL.len());
        for category in ScoreCategory::ALL {
            let column = category_column(category);
            let rows = players::Entity::find()
                .filter(column.gt(0))
                .find_also_related(games::Entity)
                .order_by_desc(column)
                .order_by_asc(games::Column::CreatedAt)
                .order_by_asc(players::Column::Id)
                .limit(limit)
                .all(&self.connection)
                .await?;

            let entries = rows
                .into_iter()
                .map(|(row, game)| {
                    let game = game.ok_or_else(|| orphaned("player"))?;
                    let record = player_record(row);
                    Ok(SectionBest {
                        score: record.category_total(category),
                        player_name: record.name,
                        game_id: parse_uuid(&game.uuid)?,
                        played_at: game.created_at,
                    })
                })
                .collect::<Result<Vec<_>, StoreError>>()?;
            leaders.push(CategoryLeaders { category, entries });
        }
        Ok(leaders)
    }

    async fn is_high_score(&self, score: u32, limit: u64) -> Result<HighScoreCheck, StoreError> {
        let ranked: Vec<i32> = high_scores::Entity::find()
            .select_only()
            .column(high_scores::Column::Score)
            .order_by_desc(high_scores::Column::Score)
            .order_by_asc(high_scores::Column::AchievedAt)
            .limit(limit)
            .into_tuple()
            .all(&self.connection)
            .await?;

        let full = u64::try_from(ranked.len()).unwrap_or(u64::MAX) >= limit;
        let check = match ranked.last() {
            Some(&last) if full => {
                let threshold = from_db_int(last);
                HighScoreCheck {
                    qualifies: score >= threshold,
                    threshold,
                }
            }
            _ => HighScoreCheck {
                qualifies: true,
                threshold: 0,
            },
        };
        Ok(check)
    }

    async fn player_statistics(&self, name: &str) -> Result<PlayerStatistics, StoreError> {
        let matching = || players::Entity::find().filter(name_contains(players::Column::NameFolded, name));

        let games_played = matching().count(&self.connection).await?;
        let games_won = matching()
            .filter(players::Column::Winner.eq(true))
            .count(&self.connection)
            .await?;

        let aggregates = matching()
            .select_only()
            .column_as(players::Column::FinalScore.max(), "best_score")
            .column_as(players::Column::FinalScore.sum(), "score_sum")
            .column_as(players::Column::YellowTotal.max(), "best_yellow")
            .column_as(players::Column::GreenTotal.max(), "best_green")
            .column_as(players::Column::OrangeTotal.max(), "best_orange")
            .column_as(players::Column::PurpleTotal.max(), "best_purple")
            .column_as(players::Column::BlueTotal.max(), "best_blue")
            .column_as(players::Column::Bonus.max(), "best_bonus")
            .into_model::<PlayerAggregates>()
            .one(&self.connection)
            .await?
            .unwrap_or_default();

        let win_rate = if games_played > 0 {
            games_won as f64 / games_played as f64 * 100.0
        } else {
            0.0
        };
        let average_score = match aggregates.score_sum {
            Some(sum) if games_played > 0 => Some(sum as f64 / games_played as f64),
            _ => None,
        };
        let best_by_category = ScoreCategory::ALL
            .into_iter()
            .map(|category| CategoryBest {
                category,
                best: aggregates.best_for(category),
            })
            .collect();

        Ok(PlayerStatistics {
            name_query: name.to_owned(),
            games_played,
            games_won,
            win_rate,
            best_score: aggregates.best_score.map(from_db_int),
            average_score,
            best_by_category,
        })
    }
}

#[derive(Debug, Default, FromQueryResult)]
struct PlayerAggregates {
    best_score: Option<i32>,
    score_sum: Option<i64>,
    best_yellow: Option<i32>,
    best_green: Option<i32>,
    best_orange: Option<i32>,
    best_purple: Option<i32>,
    best_blue: Option<i32>,
    best_bonus: Option<i32>,
}

impl PlayerAggregates {
    fn best_for(&self, category: ScoreCategory) -> Option<u32> {
        let best = match category {
            ScoreCategory::Yellow => self.best_yellow,
            ScoreCategory::Green => self.best_green,
            ScoreCategory::Orange => self.best_orange,
            ScoreCategory::Purple => self.best_purple,
            ScoreCategory::Blue => self.best_blue,
            ScoreCategory::Bonus => self.best_bonus,
        };
        best.map(from_db_int)
    }
}

fn filtered_games(filter: &GameFilter) -> Select<games::Entity> {
    let mut condition = Condition::all();
    if let Some(query) = non_blank(filter.query.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(name_contains(games::Column::WinnerNameFolded, query))
                .add(games::Column::Id.in_subquery(participant_game_ids(query))),
        );
    }
    if let Some(name) = non_blank(filter.player_name.as_deref()) {
        condition = condition.add(games::Column::Id.in_subquery(participant_game_ids(name)));
    }
    if let Some(from) = filter.date_from {
        condition = condition.add(games::Column::CreatedAt.gte(from));
    }
    if let Some(to) = filter.date_to {
        condition = condition.add(games::Column::CreatedAt.lte(to));
    }
    games::Entity::find().filter(condition)
}

fn participant_game_ids(name: &str) -> SelectStatement {
    Query::select()
        .column(players::Column::GameId)
        .from(players::Entity)
        .and_where(name_contains(players::Column::NameFolded, name))
        .to_owned()
}

/// Substring match against a `*_folded` column.
///
/// Both sides go through [`fold_name`]; SQL `LOWER` only folds ASCII on SQLite.
fn name_contains<C: ColumnTrait>(folded_column: C, text: &str) -> SimpleExpr {
    Expr::col((folded_column.entity_name(), folded_column))
        .like(LikeExpr::new(contains_pattern(text)).escape('\\'))
}

fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in fold_name(text).chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

fn category_column(category: ScoreCategory) -> players::Column {
    match category {
        ScoreCategory::Yellow => players::Column::YellowTotal,
        ScoreCategory::Green => players::Column::GreenTotal,
        ScoreCategory::Orange => players::Column::OrangeTotal,
        ScoreCategory::Purple => players::Column::PurpleTotal,
        ScoreCategory::Blue => players::Column::BlueTotal,
        ScoreCategory::Bonus => players::Column::Bonus,
    }
}

fn sea_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

fn player_record(model: players::Model) -> PlayerRecord {
    PlayerRecord {
        name: model.name,
        final_score: from_db_int(model.final_score),
        is_winner: model.winner,
        yellow_total: from_db_int(model.yellow_total),
        green_total: from_db_int(model.green_total),
        orange_total: from_db_int(model.orange_total),
        purple_total: from_db_int(model.purple_total),
        blue_total: from_db_int(model.blue_total),
        fox_count: from_db_int(model.fox_count),
        bonus: from_db_int(model.bonus),
    }
}

fn game_summary(model: games::Model) -> Result<GameSummary, StoreError> {
    Ok(GameSummary {
        id: parse_uuid(&model.uuid)?,
        created_at: model.created_at,
        player_count: from_db_int(model.player_count),
        winner_name: model.winner_name,
        winner_score: model.winner_score.map(from_db_int),
    })
}

fn to_db_int(value: u32, field: &str) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| StoreError::validation(format!("{field} {value} is too large")))
}

// Columns only ever receive values from `to_db_int`; anything negative is foreign data.
fn from_db_int(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn parse_uuid(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw)
        .map_err(|err| StoreError::Database(DbErr::Custom(format!("invalid game uuid {raw:?}: {err}"))))
}

fn orphaned(row: &str) -> StoreError {
    StoreError::Database(DbErr::RecordNotFound(format!("{row} row without a game")))
}
