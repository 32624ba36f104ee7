//! Employee Repository

use super::{RepoError, RepoResult};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};
use sqlx::SqliteExecutor;

const EMPLOYEE_SELECT: &str = "SELECT hrms_id, name, emp_number, date_of_birth, category, department_id, status, created_at, updated_at FROM employee";

pub async fn find_by_hrms_id(db: impl SqliteExecutor<'_>, hrms_id: &str) -> RepoResult<Option<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE hrms_id = ?");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(hrms_id)
        .fetch_optional(db)
        .await?;
    Ok(employee)
}

pub async fn find_all(db: impl SqliteExecutor<'_>, limit: i64, offset: i64) -> RepoResult<Vec<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} ORDER BY hrms_id LIMIT ? OFFSET ?");
    let employees = sqlx::query_as::<_, Employee>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
    Ok(employees)
}

pub async fn create(db: impl SqliteExecutor<'_>, data: &EmployeeCreate) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let sql = "INSERT INTO employee (hrms_id, name, emp_number, date_of_birth, category, department_id, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'active', ?7, ?7) RETURNING hrms_id, name, emp_number, date_of_birth, category, department_id, status, created_at, updated_at";
    let employee = sqlx::query_as::<_, Employee>(sql)
        .bind(&data.hrms_id)
        .bind(&data.name)
        .bind(&data.emp_number)
        .bind(&data.date_of_birth)
        .bind(data.category)
        .bind(data.department_id)
        .bind(now)
        .fetch_one(db)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(msg) if msg.contains("emp_number") => {
                RepoError::Duplicate(format!("Employee number {} already exists", data.emp_number))
            }
            RepoError::Duplicate(_) => {
                RepoError::Duplicate(format!("Employee {} already exists", data.hrms_id))
            }
            other => other,
        })?;
    Ok(employee)
}

/// Update mutable employee fields. Category is not updatable.
pub async fn update(db: impl SqliteExecutor<'_>, hrms_id: &str, data: &EmployeeUpdate) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let sql = "UPDATE employee SET name = COALESCE(?1, name), department_id = COALESCE(?2, department_id), status = COALESCE(?3, status), updated_at = ?4 WHERE hrms_id = ?5 RETURNING hrms_id, name, emp_number, date_of_birth, category, department_id, status, created_at, updated_at";
    sqlx::query_as::<_, Employee>(sql)
        .bind(&data.name)
        .bind(data.department_id)
        .bind(data.status)
        .bind(now)
        .bind(hrms_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {hrms_id} not found")))
}
