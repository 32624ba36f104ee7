use super::*;
use crate::artifact::{ArtifactError, CardArtifactWorker, CardSheet, FileCardRenderer};
use crate::db::DbService;
use crate::db::repository::{application as application_repo, controlling_officer, employee, icard, icard_request, sequence};
use async_trait::async_trait;
use shared::models::{
    Application, ApplicationCreate, ApplicationStatus, ControllingOfficer, ControllingOfficerCreate,
    Employee, EmployeeCategory, EmployeeCreate, IcardStatus, RequestStatus, ReviewAction,
    ReviewDecision, ReviewStage, RevocationCreate,
};
use std::time::Duration;
use tempfile::TempDir;

// ========================================================================
// Test environment
// ========================================================================

struct TestEnv {
    service: WorkflowService,
    pool: SqlitePool,
    dir: TempDir,
}

impl TestEnv {
    fn artifact_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("icards")
    }
}

async fn setup() -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let renderer = Arc::new(FileCardRenderer::new(dir.path().join("icards")));
    setup_in(dir, renderer).await
}

async fn setup_with_renderer(renderer: Arc<dyn CardRenderer>) -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    setup_in(dir, renderer).await
}

async fn setup_in(dir: TempDir, renderer: Arc<dyn CardRenderer>) -> TestEnv {
    let db_path = dir.path().join("icard.db");
    let db = DbService::new(db_path.to_str().unwrap()).await.unwrap();
    let service = WorkflowService::new(db.pool.clone(), SequenceAllocator::default(), renderer);
    TestEnv {
        service,
        pool: db.pool,
        dir,
    }
}

/// Renderer that always fails (printer / storage down)
struct FailingRenderer;

#[async_trait]
impl CardRenderer for FailingRenderer {
    async fn render(&self, _sheet: &CardSheet) -> Result<String, ArtifactError> {
        Err(ArtifactError::Render("renderer offline".to_string()))
    }
}

// ========================================================================
// Fixtures
// ========================================================================

async fn create_employee(env: &TestEnv, hrms_id: &str, category: EmployeeCategory) -> Employee {
    employee::create(
        &env.pool,
        &EmployeeCreate {
            hrms_id: hrms_id.to_string(),
            name: format!("Employee {hrms_id}"),
            emp_number: format!("EMP-{hrms_id}"),
            date_of_birth: "1988-06-15".to_string(),
            category,
            department_id: Some(3),
        },
    )
    .await
    .unwrap()
}

async fn create_officer(env: &TestEnv, email: &str) -> ControllingOfficer {
    controlling_officer::create(
        &env.pool,
        &ControllingOfficerCreate {
            name: format!("Officer {email}"),
            email: email.to_string(),
            designation: Some("Senior DEN".to_string()),
            department_id: Some(3),
        },
    )
    .await
    .unwrap()
}

fn employee_ctx(hrms_id: &str) -> AuthContext {
    AuthContext::new(hrms_id, Role::Employee)
}

fn co_ctx(officer: &ControllingOfficer) -> AuthContext {
    AuthContext::controlling_officer(officer.email.clone(), officer.id)
}

fn dealer_ctx() -> AuthContext {
    AuthContext::new("dealer@example.org", Role::Dealer)
}

fn awo_ctx() -> AuthContext {
    AuthContext::new("awo@example.org", Role::Awo)
}

fn approve(remarks: &str) -> ReviewDecision {
    ReviewDecision {
        action: ReviewAction::Approve,
        remarks: remarks.to_string(),
    }
}

fn reject(remarks: &str) -> ReviewDecision {
    ReviewDecision {
        action: ReviewAction::Reject,
        remarks: remarks.to_string(),
    }
}

fn application_form(hrms_id: &str, controlling_officer_id: Option<i64>) -> ApplicationCreate {
    ApplicationCreate {
        hrms_id: hrms_id.to_string(),
        designation: "Technician Gr. I".to_string(),
        blood_group: Some("B+".to_string()),
        mobile_number: Some("9800000000".to_string()),
        address: Some("Railway Colony, Qtr 12".to_string()),
        identification_mark: Some("Mole on left cheek".to_string()),
        photo_path: Some(format!("uploads/{hrms_id}/photo.jpg")),
        signature_path: Some(format!("uploads/{hrms_id}/sign.png")),
        controlling_officer_id,
    }
}

async fn submit(env: &TestEnv, hrms_id: &str, officer: Option<&ControllingOfficer>) -> Application {
    env.service
        .submit_application(&employee_ctx(hrms_id), application_form(hrms_id, officer.map(|o| o.id)))
        .await
        .unwrap()
}

/// Drive an application through CO (when assigned) and Dealer approval to `awo_pending`
async fn advance_to_awo(env: &TestEnv, app: &Application, officer: Option<&ControllingOfficer>) {
    if let Some(officer) = officer {
        env.service
            .co_review(&co_ctx(officer), app.id, &approve("Verified service record"))
            .await
            .unwrap();
    }
    let app = env
        .service
        .dealer_review(&dealer_ctx(), app.id, &approve("Documents in order"))
        .await
        .unwrap();
    assert_eq!(app.current_status, ApplicationStatus::AwoPending);
}

/// Submit and approve all the way; returns the issuing outcome
async fn issue_card_for(
    env: &TestEnv,
    hrms_id: &str,
    officer: Option<&ControllingOfficer>,
) -> ReviewOutcome {
    let app = submit(env, hrms_id, officer).await;
    advance_to_awo(env, &app, officer).await;
    env.service
        .awo_decision(&awo_ctx(), app.id, &approve("Approved for issue"))
        .await
        .unwrap()
}

async fn count_icards(env: &TestEnv, hrms_id: &str) -> usize {
    icard::find_by_employee(&env.pool, hrms_id).await.unwrap().len()
}

mod test_revocation;
