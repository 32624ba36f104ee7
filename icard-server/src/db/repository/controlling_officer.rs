//! Controlling Officer Repository

use super::{RepoError, RepoResult};
use shared::models::{ControllingOfficer, ControllingOfficerCreate};
use sqlx::SqliteExecutor;

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<ControllingOfficer>> {
    let officer = sqlx::query_as::<_, ControllingOfficer>(
        "SELECT id, name, email, designation, department_id, is_active, created_at FROM controlling_officer WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(officer)
}

/// Reviewer identity lookup (email is case-insensitive)
pub async fn find_by_email(db: impl SqliteExecutor<'_>, email: &str) -> RepoResult<Option<ControllingOfficer>> {
    let officer = sqlx::query_as::<_, ControllingOfficer>(
        "SELECT id, name, email, designation, department_id, is_active, created_at FROM controlling_officer WHERE email = ?",
    )
    .bind(email.trim())
    .fetch_optional(db)
    .await?;
    Ok(officer)
}

pub async fn find_active(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<ControllingOfficer>> {
    let officers = sqlx::query_as::<_, ControllingOfficer>(
        "SELECT id, name, email, designation, department_id, is_active, created_at FROM controlling_officer WHERE is_active = 1 ORDER BY name",
    )
    .fetch_all(db)
    .await?;
    Ok(officers)
}

pub async fn create(db: impl SqliteExecutor<'_>, data: &ControllingOfficerCreate) -> RepoResult<ControllingOfficer> {
    let now = shared::util::now_millis();
    sqlx::query_as::<_, ControllingOfficer>(
        "INSERT INTO controlling_officer (name, email, designation, department_id, is_active, created_at) VALUES (?1, ?2, ?3, ?4, 1, ?5) RETURNING id, name, email, designation, department_id, is_active, created_at",
    )
    .bind(&data.name)
    .bind(data.email.trim())
    .bind(&data.designation)
    .bind(data.department_id)
    .bind(now)
    .fetch_one(db)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Controlling officer {} already exists", data.email))
        }
        other => other,
    })
}
