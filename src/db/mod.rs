use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;

pub type DbPool = SqlitePool;

/// One row of the durable per-member voice-time ledger. `total_seconds`
/// only ever grows; rows are never deleted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LedgerEntry {
    pub user_id: String,
    pub total_seconds: i64,
    pub last_seen: DateTime<Utc>,
}

pub async fn init_db(database_path: &str) -> Result<DbPool, sqlx::Error> {
    if let Some(parent) = Path::new(database_path).parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Credits `seconds` of voice time to `user_id` and refreshes `last_seen`,
/// creating the row on first sight. A single statement, so concurrent
/// writers cannot lose an increment.
pub async fn add_voice_time(
    pool: &DbPool,
    user_id: &str,
    seconds: i64,
    seen_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO voice_ledger (user_id, total_seconds, last_seen)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id)
        DO UPDATE SET total_seconds = total_seconds + excluded.total_seconds,
                      last_seen = excluded.last_seen
        "#,
    )
    .bind(user_id)
    .bind(seconds)
    .bind(seen_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_entry(pool: &DbPool, user_id: &str) -> Result<Option<LedgerEntry>, sqlx::Error> {
    let entry = sqlx::query_as::<_, LedgerEntry>(
        "SELECT * FROM voice_ledger WHERE user_id = ?"
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

pub async fn top_entries(pool: &DbPool, limit: i64) -> Result<Vec<LedgerEntry>, sqlx::Error> {
    let entries = sqlx::query_as::<_, LedgerEntry>(
        "SELECT * FROM voice_ledger ORDER BY total_seconds DESC LIMIT ?"
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
