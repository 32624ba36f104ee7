//! Application submission and the CO / Dealer / AWO reviews

use serde::Serialize;
use shared::error::ErrorCode;
use shared::models::{
    Application, ApplicationCreate, ApplicationStatus, Employee, Icard, IcardCreate,
    ReviewAction, ReviewDecision, ReviewStage,
};

use super::{WorkflowError, WorkflowResult, WorkflowService, transitions, validate_remarks};
use crate::artifact::produce_for_card;
use crate::auth::{AuthContext, Role};
use crate::db::repository::application::StageReview;
use crate::db::repository::{RepoError, application, controlling_officer, employee, icard};
use crate::utils::validation::{MAX_NAME_LEN, validate_workflow_text};

/// Result of a committed review
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub application: Application,
    /// Issued card (AWO approval only)
    pub icard: Option<Icard>,
}

fn application_not_found(id: i64) -> WorkflowError {
    WorkflowError::NotFound(
        ErrorCode::ApplicationNotFound,
        format!("Application {id} not found"),
    )
}

fn already_reviewed(id: i64, stage: ReviewStage) -> WorkflowError {
    WorkflowError::AlreadyReviewed(
        ErrorCode::ApplicationAlreadyReviewed,
        format!(
            "Application {id} was already reviewed; it is no longer awaiting {} review",
            stage.reviewer()
        ),
    )
}

/// The application must be waiting for `stage`
fn ensure_pending(app: &Application, stage: ReviewStage) -> WorkflowResult<()> {
    if app.current_status == stage.pending_status() {
        return Ok(());
    }
    Err(WorkflowError::InvalidTransition(
        ErrorCode::ApplicationInvalidTransition,
        format!(
            "Application {} is {}, not awaiting {} review",
            app.id,
            app.current_status,
            stage.reviewer()
        ),
    ))
}

impl WorkflowService {
    /// Submit an application; routing depends on the employee category.
    pub async fn submit_application(
        &self,
        ctx: &AuthContext,
        data: ApplicationCreate,
    ) -> WorkflowResult<Application> {
        self.require_role(ctx, &[Role::Employee, Role::Admin], "submit_application")?;
        if ctx.current_role() == Role::Employee && ctx.current_principal_id() != data.hrms_id {
            return Err(WorkflowError::Forbidden(
                "Employees may only apply for their own I-Card".to_string(),
            ));
        }
        validate_workflow_text(
            &data.designation,
            "Designation",
            ErrorCode::RequiredField,
            MAX_NAME_LEN,
        )?;

        let employee = self.load_employee(&data.hrms_id).await?;
        if !employee.is_active() {
            return Err(WorkflowError::ValidationFailed(
                ErrorCode::ValidationFailed,
                format!("Employee {} is inactive", employee.hrms_id),
            ));
        }

        if let Some(card) = icard::find_current_by_employee(&self.pool, &employee.hrms_id).await?
            && card.is_active()
        {
            return Err(WorkflowError::InvalidTransition(
                ErrorCode::IcardAlreadyIssued,
                format!(
                    "Employee {} already holds active I-Card {}",
                    employee.hrms_id, card.icard_number
                ),
            ));
        }
        if let Some(latest) = application::find_latest_by_employee(&self.pool, &employee.hrms_id).await?
            && !latest.current_status.is_terminal()
        {
            return Err(in_progress(&employee.hrms_id, Some(latest.id)));
        }

        let status = transitions::route_on_submit(employee.category, data.controlling_officer_id)?;
        let officer_id = if employee.category.requires_co_review() {
            let id = data.controlling_officer_id.unwrap_or_default();
            match controlling_officer::find_by_id(&self.pool, id).await? {
                Some(officer) if officer.is_active => Some(officer.id),
                _ => {
                    return Err(WorkflowError::ValidationFailed(
                        ErrorCode::ControllingOfficerNotFound,
                        format!("Controlling officer {id} does not exist or is inactive"),
                    ));
                }
            }
        } else {
            None
        };

        let created = application::insert(&self.pool, &data, officer_id, status)
            .await
            .map_err(|e| match e {
                // Concurrent submission lost on the in-flight unique index
                RepoError::Duplicate(_) => in_progress(&employee.hrms_id, None),
                other => other.into(),
            })?;

        tracing::info!(
            application_id = created.id,
            hrms_id = %created.hrms_id,
            category = %employee.category,
            status = %created.current_status,
            "Application submitted"
        );
        Ok(created)
    }

    /// Read one application as the caller may see it.
    ///
    /// Employees see only their own, controlling officers only those assigned to them.
    pub async fn get_application(&self, ctx: &AuthContext, id: i64) -> WorkflowResult<Application> {
        let app = self.load_application(id).await?;
        let visible = match ctx.current_role() {
            Role::Employee => app.hrms_id == ctx.current_principal_id(),
            Role::ControllingOfficer => {
                ctx.officer_id.is_some() && app.controlling_officer_id == ctx.officer_id
            }
            Role::Dealer | Role::Awo | Role::Admin => true,
        };
        if !visible {
            return Err(application_not_found(id));
        }
        Ok(app)
    }

    /// Applications waiting for the caller's stage (oldest first)
    pub async fn pending_queue(&self, ctx: &AuthContext) -> WorkflowResult<Vec<Application>> {
        let queue = match ctx.current_role() {
            Role::ControllingOfficer => {
                let officer_id = bound_officer(ctx)?;
                application::find_pending_for_officer(&self.pool, officer_id).await?
            }
            Role::Dealer => application::find_by_status(&self.pool, ApplicationStatus::DealerPending).await?,
            Role::Awo => application::find_by_status(&self.pool, ApplicationStatus::AwoPending).await?,
            Role::Admin => {
                let stages = [ReviewStage::Co, ReviewStage::Dealer, ReviewStage::Awo];
                futures::future::try_join_all(
                    stages
                        .iter()
                        .map(|stage| application::find_by_status(&self.pool, stage.pending_status())),
                )
                .await?
                .into_iter()
                .flatten()
                .collect()
            }
            Role::Employee => {
                return Err(WorkflowError::Forbidden(
                    "Employees have no review queue".to_string(),
                ));
            }
        };
        Ok(queue)
    }

    /// Controlling officer review of an assigned non-gazetted application
    pub async fn co_review(
        &self,
        ctx: &AuthContext,
        application_id: i64,
        decision: &ReviewDecision,
    ) -> WorkflowResult<Application> {
        self.require_role(ctx, &[Role::ControllingOfficer], "co_review")?;
        let officer_id = bound_officer(ctx)?;
        validate_remarks(&decision.remarks)?;

        let app = self.load_application(application_id).await?;
        if app.controlling_officer_id != Some(officer_id) {
            return Err(application_not_found(application_id));
        }
        ensure_pending(&app, ReviewStage::Co)?;

        Ok(self.apply_review(ReviewStage::Co, &app, decision).await?.application)
    }

    pub async fn dealer_review(
        &self,
        ctx: &AuthContext,
        application_id: i64,
        decision: &ReviewDecision,
    ) -> WorkflowResult<Application> {
        self.require_role(ctx, &[Role::Dealer, Role::Admin], "dealer_review")?;
        validate_remarks(&decision.remarks)?;

        let app = self.load_application(application_id).await?;
        ensure_pending(&app, ReviewStage::Dealer)?;

        Ok(self.apply_review(ReviewStage::Dealer, &app, decision).await?.application)
    }

    /// AWO final decision; approval issues the I-Card.
    pub async fn awo_decision(
        &self,
        ctx: &AuthContext,
        application_id: i64,
        decision: &ReviewDecision,
    ) -> WorkflowResult<ReviewOutcome> {
        self.require_role(ctx, &[Role::Awo], "awo_decision")?;
        validate_remarks(&decision.remarks)?;

        let app = self.load_application(application_id).await?;
        ensure_pending(&app, ReviewStage::Awo)?;

        self.apply_review(ReviewStage::Awo, &app, decision).await
    }

    /// Commit `decision` at `stage` against the application as the reviewer loaded it.
    ///
    /// The guard is the stage's pending status; a concurrent reviewer that
    /// committed first makes this return `AlreadyReviewed`.
    pub(crate) async fn apply_review(
        &self,
        stage: ReviewStage,
        app: &Application,
        decision: &ReviewDecision,
    ) -> WorkflowResult<ReviewOutcome> {
        if stage == ReviewStage::Awo && decision.action == ReviewAction::Approve {
            return self.issue_card(app, decision.remarks.trim()).await;
        }

        let new_status = transitions::next_status(stage, decision.action);
        let review = StageReview {
            stage,
            remarks: decision.remarks.trim(),
            reviewed_at: shared::util::now_millis(),
        };
        let rows = application::conditional_update_status(
            &self.pool,
            app.id,
            stage.pending_status(),
            new_status,
            review,
        )
        .await?;

        if rows == 0 {
            tracing::warn!(application_id = app.id, stage = ?stage, "Review lost to a concurrent reviewer");
            return Err(already_reviewed(app.id, stage));
        }

        tracing::info!(
            application_id = app.id,
            hrms_id = %app.hrms_id,
            reviewer = stage.reviewer(),
            action = ?decision.action,
            status = %new_status,
            "Application reviewed"
        );

        Ok(ReviewOutcome {
            application: self.load_application(app.id).await?,
            icard: None,
        })
    }

    /// AWO approval: status change, card number and I-Card row commit together.
    ///
    /// The artifact is produced after commit; a render failure only leaves
    /// `pdf_path` empty for the artifact worker.
    async fn issue_card(&self, app: &Application, remarks: &str) -> WorkflowResult<ReviewOutcome> {
        let employee = self.load_employee(&app.hrms_id).await?;
        let now = shared::util::now_millis();

        // First statement is a write so the transaction takes the write lock up front
        let mut tx = self.pool.begin().await?;
        let review = StageReview {
            stage: ReviewStage::Awo,
            remarks,
            reviewed_at: now,
        };
        let rows = application::conditional_update_status(
            &mut *tx,
            app.id,
            ApplicationStatus::AwoPending,
            ApplicationStatus::Approved,
            review,
        )
        .await?;
        if rows == 0 {
            tracing::warn!(application_id = app.id, "AWO approval lost to a concurrent decision");
            return Err(already_reviewed(app.id, ReviewStage::Awo));
        }

        let icard_number = self
            .allocator
            .next_card_number(&mut *tx, employee.category)
            .await?;

        // uq_icard_current rejects a second current card for the employee
        let mut card = icard::insert(
            &mut *tx,
            &IcardCreate {
                hrms_id: employee.hrms_id.clone(),
                application_id: app.id,
                icard_number,
                generated_at: now,
            },
        )
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) if msg.contains("icard.hrms_id") => WorkflowError::InvalidTransition(
                ErrorCode::IcardAlreadyIssued,
                format!("Employee {} already holds an active I-Card", employee.hrms_id),
            ),
            other => WorkflowError::PersistenceFailed(other.to_string()),
        })?;

        tx.commit().await?;

        let mut approved = app.clone();
        approved.current_status = ApplicationStatus::Approved;
        approved.awo_remarks = Some(remarks.to_string());
        approved.awo_reviewed_at = Some(now);
        approved.updated_at = now;

        tracing::info!(
            application_id = app.id,
            hrms_id = %employee.hrms_id,
            icard_id = card.id,
            icard_number = %card.icard_number,
            "Application approved, I-Card issued"
        );

        match produce_for_card(&self.pool, self.renderer.as_ref(), &card).await {
            Ok(Some(path)) => card.pdf_path = Some(path),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    icard_id = card.id,
                    icard_number = %card.icard_number,
                    error = %e,
                    "I-Card artifact failed, left for the artifact worker"
                );
            }
        }

        Ok(ReviewOutcome {
            application: approved,
            icard: Some(card),
        })
    }

    pub(crate) async fn load_application(&self, id: i64) -> WorkflowResult<Application> {
        application::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| application_not_found(id))
    }

    async fn load_employee(&self, hrms_id: &str) -> WorkflowResult<Employee> {
        employee::find_by_hrms_id(&self.pool, hrms_id)
            .await?
            .ok_or_else(|| {
                WorkflowError::NotFound(
                    ErrorCode::EmployeeNotFound,
                    format!("Employee {hrms_id} not found"),
                )
            })
    }
}

fn in_progress(hrms_id: &str, application_id: Option<i64>) -> WorkflowError {
    let message = match application_id {
        Some(id) => format!("Employee {hrms_id} already has application {id} in progress"),
        None => format!("Employee {hrms_id} already has an application in progress"),
    };
    WorkflowError::InvalidTransition(ErrorCode::ApplicationInProgress, message)
}

fn bound_officer(ctx: &AuthContext) -> WorkflowResult<i64> {
    ctx.officer_id.ok_or_else(|| {
        WorkflowError::Forbidden("No controlling officer is bound to this login".to_string())
    })
}
