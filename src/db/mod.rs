use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

pub mod entity;
pub mod schema;

pub const DEFAULT_DB_URL: &str = "sqlite://clever_scores.db?mode=rwc";

const LOG_TARGET: &str = "clever_scorer::db";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);

/// Opens a pool and makes sure the score tables and indexes exist.
pub async fn connect_to(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(url.to_owned());
    opt.connect_timeout(CONNECT_TIMEOUT)
        .acquire_timeout(CONNECT_TIMEOUT)
        .sqlx_logging(false);
    // every pooled connection to an in-memory SQLite URL is a separate database
    if url.contains(":memory:") {
        opt.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(opt).await?;
    schema::ensure_schema(&conn).await?;
    info!(
        target: LOG_TARGET,
        backend = ?conn.get_database_backend(),
        "score database ready"
    );
    Ok(conn)
}
