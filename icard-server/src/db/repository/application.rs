//! Application Repository

use super::{RepoError, RepoResult};
use shared::models::{Application, ApplicationCreate, ApplicationStatus, ReviewStage};
use sqlx::SqliteExecutor;

const APPLICATION_COLUMNS: &str = "id, hrms_id, designation, blood_group, mobile_number, address, identification_mark, photo_path, signature_path, controlling_officer_id, current_status, co_remarks, co_reviewed_at, dealer_remarks, dealer_reviewed_at, awo_remarks, awo_reviewed_at, created_at, updated_at";

/// Review fields written together with a status change
#[derive(Debug, Clone, Copy)]
pub struct StageReview<'a> {
    pub stage: ReviewStage,
    pub remarks: &'a str,
    pub reviewed_at: i64,
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Application>> {
    let sql = format!("SELECT {APPLICATION_COLUMNS} FROM application WHERE id = ?");
    let application = sqlx::query_as::<_, Application>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(application)
}

/// Most recent application of an employee
pub async fn find_latest_by_employee(db: impl SqliteExecutor<'_>, hrms_id: &str) -> RepoResult<Option<Application>> {
    let sql = format!(
        "SELECT {APPLICATION_COLUMNS} FROM application WHERE hrms_id = ? ORDER BY created_at DESC, id DESC LIMIT 1"
    );
    let application = sqlx::query_as::<_, Application>(&sql)
        .bind(hrms_id)
        .fetch_optional(db)
        .await?;
    Ok(application)
}

pub async fn find_by_employee(db: impl SqliteExecutor<'_>, hrms_id: &str) -> RepoResult<Vec<Application>> {
    let sql = format!(
        "SELECT {APPLICATION_COLUMNS} FROM application WHERE hrms_id = ? ORDER BY created_at DESC, id DESC"
    );
    let applications = sqlx::query_as::<_, Application>(&sql)
        .bind(hrms_id)
        .fetch_all(db)
        .await?;
    Ok(applications)
}

/// Reviewer queue (oldest first)
pub async fn find_by_status(db: impl SqliteExecutor<'_>, status: ApplicationStatus) -> RepoResult<Vec<Application>> {
    let sql = format!(
        "SELECT {APPLICATION_COLUMNS} FROM application WHERE current_status = ? ORDER BY created_at, id"
    );
    let applications = sqlx::query_as::<_, Application>(&sql)
        .bind(status)
        .fetch_all(db)
        .await?;
    Ok(applications)
}

/// CO queue: only applications assigned to this officer
pub async fn find_pending_for_officer(db: impl SqliteExecutor<'_>, officer_id: i64) -> RepoResult<Vec<Application>> {
    let sql = format!(
        "SELECT {APPLICATION_COLUMNS} FROM application WHERE controlling_officer_id = ? AND current_status = 'co_pending' ORDER BY created_at, id"
    );
    let applications = sqlx::query_as::<_, Application>(&sql)
        .bind(officer_id)
        .fetch_all(db)
        .await?;
    Ok(applications)
}

/// Insert a submitted application at its routed status.
///
/// A second in-flight application for the same employee violates
/// `uq_application_in_flight` and surfaces as `RepoError::Duplicate`.
pub async fn insert(
    db: impl SqliteExecutor<'_>,
    data: &ApplicationCreate,
    controlling_officer_id: Option<i64>,
    status: ApplicationStatus,
) -> RepoResult<Application> {
    let now = shared::util::now_millis();
    let sql = format!(
        "INSERT INTO application (hrms_id, designation, blood_group, mobile_number, address, identification_mark, photo_path, signature_path, controlling_officer_id, current_status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11) RETURNING {APPLICATION_COLUMNS}"
    );
    sqlx::query_as::<_, Application>(&sql)
        .bind(&data.hrms_id)
        .bind(data.designation.trim())
        .bind(&data.blood_group)
        .bind(&data.mobile_number)
        .bind(&data.address)
        .bind(&data.identification_mark)
        .bind(&data.photo_path)
        .bind(&data.signature_path)
        .bind(controlling_officer_id)
        .bind(status)
        .bind(now)
        .fetch_one(db)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => RepoError::Duplicate(format!(
                "Employee {} already has an application in progress",
                data.hrms_id
            )),
            other => other,
        })
}

/// Guarded status change: only applies while the row is still in `expected`.
///
/// Returns the number of affected rows (0 or 1).
pub async fn conditional_update_status(
    db: impl SqliteExecutor<'_>,
    id: i64,
    expected: ApplicationStatus,
    new_status: ApplicationStatus,
    review: StageReview<'_>,
) -> RepoResult<u64> {
    let sql = match review.stage {
        ReviewStage::Co => {
            "UPDATE application SET current_status = ?1, co_remarks = ?2, co_reviewed_at = ?3, updated_at = ?3 WHERE id = ?4 AND current_status = ?5"
        }
        ReviewStage::Dealer => {
            "UPDATE application SET current_status = ?1, dealer_remarks = ?2, dealer_reviewed_at = ?3, updated_at = ?3 WHERE id = ?4 AND current_status = ?5"
        }
        ReviewStage::Awo => {
            "UPDATE application SET current_status = ?1, awo_remarks = ?2, awo_reviewed_at = ?3, updated_at = ?3 WHERE id = ?4 AND current_status = ?5"
        }
    };

    let result = sqlx::query(sql)
        .bind(new_status)
        .bind(review.remarks)
        .bind(review.reviewed_at)
        .bind(id)
        .bind(expected)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
