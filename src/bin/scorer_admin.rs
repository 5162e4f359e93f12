use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use clever_scorer::db::{self, DEFAULT_DB_URL};
use clever_scorer::history::{
    CategoryLeaders, DatabaseStats, GameFilter, GamePage, GameSession, GameSort, HighScoreEntry,
    HistoryService, PlayerStatistics, SortOrder, StoreError,
};

const LOG_TARGET: &str = "bin::scorer_admin";

#[derive(Debug, Parser)]
#[command(name = "scorer_admin")]
#[command(about = "Inspect and maintain the stored score history", long_about = None)]
struct Args {
    /// SeaORM-compatible database URL (SQLite or Postgres)
    #[arg(long, global = true, env = "DATABASE_URL", default_value = DEFAULT_DB_URL)]
    database_url: String,

    /// Print results as JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Toggle structured (JSON) logs
    #[arg(long, global = true, env = "SCORER_LOG_JSON", default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Totals across every stored game
    Stats,
    /// List stored games
    History {
        /// Matches the winner or any player, case-insensitively
        #[arg(long)]
        query: Option<String>,
        /// Only games this player took part in
        #[arg(long)]
        player: Option<String>,
        /// Earliest creation time, RFC 3339 or YYYY-MM-DD
        #[arg(long, value_parser = parse_when)]
        from: Option<When>,
        /// Latest creation time, RFC 3339 or YYYY-MM-DD (whole day included)
        #[arg(long, value_parser = parse_when)]
        to: Option<When>,
        #[arg(long, value_enum, default_value_t = SortKey::Date)]
        sort: SortKey,
        /// Ignored for `--sort players`, which always lists the largest tables first
        #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
        order: OrderArg,
        #[arg(long, default_value_t = 20)]
        limit: u64,
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// Full record of one game
    Show { id: Uuid },
    /// Best winning scores
    HighScores {
        #[arg(long)]
        player: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: u64,
    },
    /// Best totals per section and for the fox bonus
    BestSections {
        #[arg(long, default_value_t = 5)]
        limit: u64,
    },
    /// Aggregates for every player whose name contains NAME
    Player { name: String },
    /// Delete one game with its players and high score
    Delete {
        id: Uuid,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Delete many games at once
    Cleanup {
        #[command(subcommand)]
        rule: CleanupRule,
        /// Confirm the deletion
        #[arg(long, global = true)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum CleanupRule {
    /// Games created more than MONTHS months ago
    OlderThan { months: u32 },
    /// Games whose winning score is below SCORE
    Below { score: u32 },
    /// Games created between START and END, both included
    Range {
        #[arg(value_parser = parse_when)]
        start: When,
        #[arg(value_parser = parse_when)]
        end: When,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortKey {
    Date,
    Score,
    Players,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

/// A command-line time bound: an exact instant or a whole calendar day.
#[derive(Clone, Copy, Debug)]
enum When {
    Instant(DateTime<Utc>),
    Day(NaiveDate),
}

impl When {
    fn start(self) -> DateTime<Utc> {
        match self {
            When::Instant(at) => at,
            When::Day(day) => day.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    fn end(self) -> DateTime<Utc> {
        match self {
            When::Instant(at) => at,
            When::Day(day) => day
                .and_hms_nano_opt(23, 59, 59, 999_999_999)
                .map(|end| end.and_utc())
                .unwrap_or_else(|| day.and_time(NaiveTime::MIN).and_utc()),
        }
    }
}

fn parse_when(raw: &str) -> Result<When, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(When::Instant(at.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(When::Day)
        .map_err(|_| format!("expected RFC 3339 time or YYYY-MM-DD, got {raw:?}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine; DATABASE_URL may come from the environment
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    let conn = db::connect_to(&args.database_url)
        .await
        .with_context(|| format!("failed to open score database at {}", args.database_url))?;
    let service = HistoryService::from_sea_orm(conn);
    run(&service, args.command, args.json).await
}


fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.compact().init();
    }
}

fn failed(action: &'static str) -> impl FnOnce(StoreError) -> anyhow::Error {
    move |err| anyhow!(err.user_message(action))
}

async fn run(service: &HistoryService, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Stats => {
            let stats = service
                .database_stats()
                .await
                .map_err(failed("load statistics"))?;
            emit(json, &stats, print_stats)
        }
        Command::History {
            query,
            player,
            from,
            to,
            sort,
            order,
            limit,
            offset,
        } => {
            let sort = match sort {
                SortKey::Date => GameSort::Date(order.into()),
                SortKey::Score => GameSort::WinningScore(order.into()),
                SortKey::Players => GameSort::PlayerCount,
            };
            let filter = GameFilter {
                query,
                player_name: player,
                date_from: from.map(When::start),
                date_to: to.map(When::end),
                sort,
            };
            let page = service
                .games(&filter, limit, offset)
                .await
                .map_err(failed("load game history"))?;
            emit(json, &page, |page| print_page(page, offset))
        }
        Command::Show { id } => {
            let session = service.game_by_id(id).await.map_err(failed("load game"))?;
            emit(json, &session, print_session)
        }
        Command::HighScores { player, limit } => {
            let scores = match player.as_deref() {
                Some(name) => service.player_high_scores(name, limit).await,
                None => service.high_scores(limit).await,
            }
            .map_err(failed("load high scores"))?;
            emit(json, &scores, |scores| print_high_scores(scores))
        }
        Command::BestSections { limit } => {
            let leaders = service
                .best_section_scores(limit)
                .await
                .map_err(failed("load best section scores"))?;
            emit(json, &leaders, |leaders| print_leaders(leaders))
        }
        Command::Player { name } => {
            let stats = service
                .player_statistics(&name)
                .await
                .map_err(failed("load player statistics"))?;
            emit(json, &stats, print_player)
        }
        Command::Delete { id, yes } => {
            require_confirmation(yes, &format!("delete game {id}"))?;
            service.delete_game(id).await.map_err(failed("delete game"))?;
            report_removed(json, 1)
        }
        Command::Cleanup { rule, yes } => {
            let removed = match rule {
                CleanupRule::OlderThan { months } => {
                    require_confirmation(yes, &format!("delete games older than {months} months"))?;
                    service.delete_games_older_than_months(months).await
                }
                CleanupRule::Below { score } => {
                    require_confirmation(yes, &format!("delete games won with less than {score}"))?;
                    service.delete_low_scoring_games(score).await
                }
                CleanupRule::Range { start, end } => {
                    let (start, end) = (start.start(), end.end());
                    require_confirmation(yes, &format!("delete games from {start} to {end}"))?;
                    service.delete_games_in_date_range(start, end).await
                }
            }
            .map_err(failed("clean up games"))?;
            report_removed(json, removed)
        }
    }
}

fn require_confirmation(yes: bool, action: &str) -> Result<()> {
    if !yes {
        bail!("refusing to {action} without --yes");
    }
    Ok(())
}

fn report_removed(json: bool, removed: u64) -> Result<()> {
    info!(target: LOG_TARGET, removed, "cleanup finished");
    emit(json, &serde_json::json!({ "removed": removed }), |_| {
        println!("Removed {removed} game(s).")
    })
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(value).context("failed to encode output")?;
        println!("{rendered}");
    } else {
        text(value);
    }
    Ok(())
}

fn day(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn print_stats(stats: &DatabaseStats) {
    println!("Games stored:      {}", stats.total_games);
    if let (Some(first), Some(last)) = (stats.earliest_game, stats.latest_game) {
        println!("First game:        {}", day(first));
        println!("Latest game:       {}", day(last));
    }
    match (stats.average_winning_score, stats.highest_score) {
        (Some(average), Some(best)) => {
            println!("Avg winning score: {average:.1}");
            println!("Highest score:     {best}");
        }
        _ => println!("No winning scores recorded yet."),
    }
}

fn print_page(page: &GamePage, offset: u64) {
    if page.games.is_empty() {
        println!("No games found.");
        return;
    }
    for game in &page.games {
        let winner = match (&game.winner_name, game.winner_score) {
            (Some(name), Some(score)) => format!("{name} ({score})"),
            _ => "-".to_string(),
        };
        println!(
            "{}  {}  {} players  winner {}",
            game.id,
            day(game.created_at),
            game.player_count,
            winner
        );
    }
    let shown = offset + page.games.len() as u64;
    println!("Showing {}-{} of {}", offset + 1, shown, page.total);
}

fn print_session(session: &GameSession) {
    println!("Game {}", session.id);
    println!("Played {} to {}", day(session.created_at), day(session.completed_at));
    if !session.notes.is_empty() {
        println!("Notes: {}", session.notes);
    }
    for record in &session.players {
        let marker = if record.is_winner { "*" } else { " " };
        println!(
            "{marker} {:<16} {:>4}  Y{} G{} O{} P{} B{}  foxes {} bonus {}",
            record.name,
            record.final_score,
            record.yellow_total,
            record.green_total,
            record.orange_total,
            record.purple_total,
            record.blue_total,
            record.fox_count,
            record.bonus
        );
    }
}

fn print_high_scores(scores: &[HighScoreEntry]) {
    if scores.is_empty() {
        println!("No high scores yet.");
        return;
    }
    for (rank, entry) in scores.iter().enumerate() {
        println!(
            "{:>3}. {:<16} {:>4}  {}  {}",
            rank + 1,
            entry.player_name,
            entry.score,
            day(entry.achieved_at),
            entry.game_id
        );
    }
}

fn print_leaders(leaders: &[CategoryLeaders]) {
    for leader in leaders {
        println!("{}:", leader.category);
        if leader.entries.is_empty() {
            println!("    (none)");
        }
        for entry in &leader.entries {
            println!(
                "    {:<16} {:>4}  {}",
                entry.player_name,
                entry.score,
                day(entry.played_at)
            );
        }
    }
}

fn print_player(stats: &PlayerStatistics) {
    println!("Players matching {:?}", stats.name_query);
    println!("Games played: {}", stats.games_played);
    println!("Games won:    {} ({:.1}%)", stats.games_won, stats.win_rate);
    if let (Some(best), Some(average)) = (stats.best_score, stats.average_score) {
        println!("Best score:   {best}");
        println!("Average:      {average:.1}");
    }
    for best in &stats.best_by_category {
        if let Some(score) = best.best {
            println!("  best {:<7} {score}", best.category.as_str());
        }
    }
}
