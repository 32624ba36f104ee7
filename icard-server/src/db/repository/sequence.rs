//! Sequence Counter Repository
//!
//! One row per card category. Allocation is a single `UPDATE ... RETURNING`, so the
//! read-increment-persist happens under SQLite's write lock.

use super::RepoResult;
use sqlx::SqliteExecutor;

/// Take the next value of a counter and advance it by one.
///
/// Returns `None` when no counter row exists for `prefix`.
pub async fn allocate(db: impl SqliteExecutor<'_>, prefix: &str) -> RepoResult<Option<i64>> {
    let now = shared::util::now_millis();
    let value = sqlx::query_scalar::<_, i64>(
        "UPDATE sequence_counter SET next_value = next_value + 1, updated_at = ? WHERE prefix = ? RETURNING next_value - 1",
    )
    .bind(now)
    .bind(prefix)
    .fetch_optional(db)
    .await?;
    Ok(value)
}

/// Peek at the value the next allocation would return
pub async fn peek(db: impl SqliteExecutor<'_>, prefix: &str) -> RepoResult<Option<i64>> {
    let value = sqlx::query_scalar::<_, i64>("SELECT next_value FROM sequence_counter WHERE prefix = ?")
        .bind(prefix)
        .fetch_optional(db)
        .await?;
    Ok(value)
}
