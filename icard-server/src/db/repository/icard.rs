//! I-Card Repository

use super::{RepoError, RepoResult};
use shared::models::{Icard, IcardCreate, IcardStatus};
use sqlx::SqliteExecutor;

const ICARD_COLUMNS: &str = "id, hrms_id, application_id, icard_number, pdf_path, status, is_current, generated_at, revoked_at, revocation_reason";

/// Fields written together with an I-Card status change
#[derive(Debug, Clone, Copy)]
pub struct IcardStatusFields<'a> {
    pub is_current: bool,
    pub revoked_at: Option<i64>,
    pub revocation_reason: Option<&'a str>,
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Icard>> {
    let sql = format!("SELECT {ICARD_COLUMNS} FROM icard WHERE id = ?");
    let icard = sqlx::query_as::<_, Icard>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(icard)
}

pub async fn find_by_application(db: impl SqliteExecutor<'_>, application_id: i64) -> RepoResult<Option<Icard>> {
    let sql = format!("SELECT {ICARD_COLUMNS} FROM icard WHERE application_id = ?");
    let icard = sqlx::query_as::<_, Icard>(&sql)
        .bind(application_id)
        .fetch_optional(db)
        .await?;
    Ok(icard)
}

/// The employee's current card, if any
pub async fn find_current_by_employee(db: impl SqliteExecutor<'_>, hrms_id: &str) -> RepoResult<Option<Icard>> {
    let sql = format!("SELECT {ICARD_COLUMNS} FROM icard WHERE hrms_id = ? AND is_current = 1");
    let icard = sqlx::query_as::<_, Icard>(&sql)
        .bind(hrms_id)
        .fetch_optional(db)
        .await?;
    Ok(icard)
}

/// Card history of an employee, newest first
pub async fn find_by_employee(db: impl SqliteExecutor<'_>, hrms_id: &str) -> RepoResult<Vec<Icard>> {
    let sql = format!("SELECT {ICARD_COLUMNS} FROM icard WHERE hrms_id = ? ORDER BY generated_at DESC, id DESC");
    let icards = sqlx::query_as::<_, Icard>(&sql)
        .bind(hrms_id)
        .fetch_all(db)
        .await?;
    Ok(icards)
}

/// Cards whose artifact has not been produced yet.
///
/// Never-tried cards come first, then the least recently tried, so cards that
/// keep failing cannot starve newer ones.
pub async fn find_missing_artifacts(db: impl SqliteExecutor<'_>, limit: i64) -> RepoResult<Vec<Icard>> {
    let sql = format!(
        "SELECT {ICARD_COLUMNS} FROM icard WHERE pdf_path IS NULL ORDER BY artifact_attempted_at IS NOT NULL, artifact_attempted_at, generated_at, id LIMIT ?"
    );
    let icards = sqlx::query_as::<_, Icard>(&sql)
        .bind(limit)
        .fetch_all(db)
        .await?;
    Ok(icards)
}

/// Insert a freshly issued card as `active` and current
pub async fn insert(db: impl SqliteExecutor<'_>, data: &IcardCreate) -> RepoResult<Icard> {
    let sql = format!(
        "INSERT INTO icard (hrms_id, application_id, icard_number, status, is_current, generated_at) VALUES (?1, ?2, ?3, 'active', 1, ?4) RETURNING {ICARD_COLUMNS}"
    );
    sqlx::query_as::<_, Icard>(&sql)
        .bind(&data.hrms_id)
        .bind(data.application_id)
        .bind(&data.icard_number)
        .bind(data.generated_at)
        .fetch_one(db)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(msg) => RepoError::Duplicate(format!(
                "I-Card {} for application {} conflicts with an existing card ({msg})",
                data.icard_number, data.application_id
            )),
            other => other,
        })
}

/// Guarded status change: only applies while the card is still in `expected`.
///
/// Returns the number of affected rows (0 or 1).
pub async fn conditional_update_status(
    db: impl SqliteExecutor<'_>,
    id: i64,
    expected: IcardStatus,
    new_status: IcardStatus,
    fields: IcardStatusFields<'_>,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE icard SET status = ?1, is_current = ?2, revoked_at = ?3, revocation_reason = ?4 WHERE id = ?5 AND status = ?6",
    )
    .bind(new_status)
    .bind(fields.is_current)
    .bind(fields.revoked_at)
    .bind(fields.revocation_reason)
    .bind(id)
    .bind(expected)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

/// Record the rendered artifact once (first writer wins)
pub async fn set_pdf_path(db: impl SqliteExecutor<'_>, id: i64, pdf_path: &str) -> RepoResult<u64> {
    let result = sqlx::query("UPDATE icard SET pdf_path = ? WHERE id = ? AND pdf_path IS NULL")
        .bind(pdf_path)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Stamp an artifact attempt on a card that still has no artifact
pub async fn mark_artifact_attempt(db: impl SqliteExecutor<'_>, id: i64, attempted_at: i64) -> RepoResult<u64> {
    let result = sqlx::query("UPDATE icard SET artifact_attempted_at = ? WHERE id = ? AND pdf_path IS NULL")
        .bind(attempted_at)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
