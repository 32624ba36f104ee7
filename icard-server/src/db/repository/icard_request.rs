//! I-Card Request Repository (吊销申请)

use super::RepoResult;
use shared::models::{IcardRequest, RequestStatus, RequestType};
use sqlx::SqliteExecutor;

const REQUEST_COLUMNS: &str = "id, icard_id, request_type, reason, status, requested_by, awo_remarks, awo_reviewed_at, created_at";

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<IcardRequest>> {
    let sql = format!("SELECT {REQUEST_COLUMNS} FROM icard_request WHERE id = ?");
    let request = sqlx::query_as::<_, IcardRequest>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(request)
}

pub async fn find_by_status(db: impl SqliteExecutor<'_>, status: RequestStatus) -> RepoResult<Vec<IcardRequest>> {
    let sql = format!("SELECT {REQUEST_COLUMNS} FROM icard_request WHERE status = ? ORDER BY created_at, id");
    let requests = sqlx::query_as::<_, IcardRequest>(&sql)
        .bind(status)
        .fetch_all(db)
        .await?;
    Ok(requests)
}

/// Pending request of the given type against one card, if any
pub async fn find_pending_for_icard(
    db: impl SqliteExecutor<'_>,
    icard_id: i64,
    request_type: RequestType,
) -> RepoResult<Option<IcardRequest>> {
    let sql = format!(
        "SELECT {REQUEST_COLUMNS} FROM icard_request WHERE icard_id = ? AND request_type = ? AND status = 'pending' LIMIT 1"
    );
    let request = sqlx::query_as::<_, IcardRequest>(&sql)
        .bind(icard_id)
        .bind(request_type)
        .fetch_optional(db)
        .await?;
    Ok(request)
}

pub async fn insert(
    db: impl SqliteExecutor<'_>,
    icard_id: i64,
    request_type: RequestType,
    reason: &str,
    requested_by: &str,
) -> RepoResult<IcardRequest> {
    let now = shared::util::now_millis();
    let sql = format!(
        "INSERT INTO icard_request (icard_id, request_type, reason, status, requested_by, created_at) VALUES (?1, ?2, ?3, 'pending', ?4, ?5) RETURNING {REQUEST_COLUMNS}"
    );
    let request = sqlx::query_as::<_, IcardRequest>(&sql)
        .bind(icard_id)
        .bind(request_type)
        .bind(reason)
        .bind(requested_by)
        .bind(now)
        .fetch_one(db)
        .await?;
    Ok(request)
}

/// Guarded decision: only applies while the request is still in `expected`.
///
/// Returns the number of affected rows (0 or 1).
pub async fn conditional_update_status(
    db: impl SqliteExecutor<'_>,
    id: i64,
    expected: RequestStatus,
    new_status: RequestStatus,
    awo_remarks: &str,
    reviewed_at: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE icard_request SET status = ?1, awo_remarks = ?2, awo_reviewed_at = ?3 WHERE id = ?4 AND status = ?5",
    )
    .bind(new_status)
    .bind(awo_remarks)
    .bind(reviewed_at)
    .bind(id)
    .bind(expected)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}
