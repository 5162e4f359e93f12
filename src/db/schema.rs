use sea_orm::sea_query::{Index, IndexCreateStatement, IndexOrder};
use sea_orm::{ConnectionTrait, DbErr, Schema};
use tracing::debug;

use super::entity::{games, high_scores, players};

const LOG_TARGET: &str = "clever_scorer::db::schema";

/// Creates the three score tables and their lookup indexes when missing.
///
/// Safe to run against an existing database; every statement is `IF NOT EXISTS`.
pub async fn ensure_schema<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let tables = [
        schema
            .create_table_from_entity(games::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(players::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(high_scores::Entity)
            .if_not_exists()
            .to_owned(),
    ];
    for table in &tables {
        db.execute(backend.build(table)).await?;
    }

    for index in indexes() {
        db.execute(backend.build(&index)).await?;
    }

    debug!(target: LOG_TARGET, ?backend, "schema ensured");
    Ok(())
}

fn indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .if_not_exists()
            .name("idx_games_date")
            .table(games::Entity)
            .col((games::Column::CreatedAt, IndexOrder::Desc))
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_games_score")
            .table(games::Entity)
            .col((games::Column::WinnerScore, IndexOrder::Desc))
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_players_game")
            .table(players::Entity)
            .col(players::Column::GameId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_high_scores")
            .table(high_scores::Entity)
            .col((high_scores::Column::Score, IndexOrder::Desc))
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_players_name")
            .table(players::Entity)
            .col(players::Column::Name)
            .to_owned(),
    ]
}
