//! Employee API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::api::require_role;
use crate::auth::{AuthContext, Role};
use crate::core::ServerState;
use crate::db::repository::{RepoError, application, controlling_officer, employee, icard};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Application, ControllingOfficer, ControllingOfficerCreate, Employee, EmployeeCreate,
    EmployeeUpdate, Icard,
};

const STAFF: &[Role] = &[Role::Dealer, Role::Awo, Role::Admin];
const RECORD_KEEPERS: &[Role] = &[Role::Dealer, Role::Admin];

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Staff may read any employee; employees only themselves
fn ensure_can_read(ctx: &AuthContext, hrms_id: &str) -> AppResult<()> {
    if ctx.current_role() == Role::Employee && ctx.current_principal_id() == hrms_id {
        return Ok(());
    }
    require_role(ctx, STAFF)
}

fn employee_not_found(hrms_id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::EmployeeNotFound,
        format!("Employee {hrms_id} not found"),
    )
}

fn is_iso_date(value: &str) -> bool {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// GET /api/employees - 员工列表 (分页)
pub async fn list(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Employee>>> {
    require_role(&ctx, STAFF)?;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);
    let employees = employee::find_all(&state.pool, limit, offset).await?;
    Ok(Json(employees))
}

/// GET /api/employees/:hrms_id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(hrms_id): Path<String>,
) -> AppResult<Json<Employee>> {
    ensure_can_read(&ctx, &hrms_id)?;
    let employee = employee::find_by_hrms_id(&state.pool, &hrms_id)
        .await?
        .ok_or_else(|| employee_not_found(&hrms_id))?;
    Ok(Json(employee))
}

/// POST /api/employees - 手工录入员工档案
pub async fn create(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    require_role(&ctx, RECORD_KEEPERS)?;
    validate_required_text(&payload.hrms_id, "hrms_id", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.emp_number, "emp_number", MAX_SHORT_TEXT_LEN)?;
    if !is_iso_date(&payload.date_of_birth) {
        return Err(AppError::validation("date_of_birth must be YYYY-MM-DD"));
    }

    let employee = employee::create(&state.pool, &payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) if msg.starts_with("Employee number") => {
                AppError::with_message(ErrorCode::EmployeeNumberExists, msg)
            }
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::EmployeeHrmsIdExists, msg),
            other => other.into(),
        })?;

    tracing::info!(
        hrms_id = %employee.hrms_id,
        category = %employee.category,
        created_by = %ctx.current_principal_id(),
        "Employee created"
    );
    Ok(Json(employee))
}

/// PUT /api/employees/:hrms_id
pub async fn update(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(hrms_id): Path<String>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    require_role(&ctx, RECORD_KEEPERS)?;
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(name) = &payload.name
        && name.trim().is_empty()
    {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "name must not be empty",
        ));
    }

    let employee = employee::update(&state.pool, &hrms_id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => employee_not_found(&hrms_id),
            other => other.into(),
        })?;
    Ok(Json(employee))
}

/// GET /api/employees/:hrms_id/icards - 发卡历史
pub async fn list_icards(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(hrms_id): Path<String>,
) -> AppResult<Json<Vec<Icard>>> {
    ensure_can_read(&ctx, &hrms_id)?;
    let cards = icard::find_by_employee(&state.pool, &hrms_id).await?;
    Ok(Json(cards))
}

/// GET /api/employees/:hrms_id/applications - 申请历史
pub async fn list_applications(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(hrms_id): Path<String>,
) -> AppResult<Json<Vec<Application>>> {
    ensure_can_read(&ctx, &hrms_id)?;
    let applications = application::find_by_employee(&state.pool, &hrms_id).await?;
    Ok(Json(applications))
}

/// GET /api/controlling-officers - 可选的 Controlling Officer
pub async fn list_officers(
    State(state): State<ServerState>,
    Extension(_ctx): Extension<AuthContext>,
) -> AppResult<Json<Vec<ControllingOfficer>>> {
    let officers = controlling_officer::find_active(&state.pool).await?;
    Ok(Json(officers))
}

/// POST /api/controlling-officers
pub async fn create_officer(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<ControllingOfficerCreate>,
) -> AppResult<Json<ControllingOfficer>> {
    require_role(&ctx, RECORD_KEEPERS)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    if !payload.email.contains('@') {
        return Err(AppError::validation("email is not a valid address"));
    }
    validate_optional_text(&payload.designation, "designation", MAX_NAME_LEN)?;

    let officer = controlling_officer::create(&state.pool, &payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => {
                AppError::with_message(ErrorCode::ControllingOfficerEmailExists, msg)
            }
            other => other.into(),
        })?;
    Ok(Json(officer))
}
