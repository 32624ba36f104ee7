use async_trait::async_trait;
use serde::Serialize;
use shared::models::{Application, Employee, EmployeeCategory, Icard};
use sqlx::SqlitePool;
use std::path::PathBuf;
use thiserror::Error;

use crate::db::repository::{RepoError, application, employee, icard};

/// Artifact errors
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    #[error("Missing record: {0}")]
    MissingRecord(String),

    #[error("Render failed: {0}")]
    Render(String),
}

/// Printable content of one card
#[derive(Debug, Clone, Serialize)]
pub struct CardSheet {
    pub icard_number: String,
    pub hrms_id: String,
    pub name: String,
    pub emp_number: String,
    pub date_of_birth: String,
    pub category: EmployeeCategory,
    pub designation: String,
    pub blood_group: Option<String>,
    pub mobile_number: Option<String>,
    pub address: Option<String>,
    pub identification_mark: Option<String>,
    pub photo_path: Option<String>,
    pub signature_path: Option<String>,
    /// RFC 3339
    pub issued_at: Option<String>,
}

impl CardSheet {
    pub fn new(icard: &Icard, employee: &Employee, application: &Application) -> Self {
        Self {
            icard_number: icard.icard_number.clone(),
            hrms_id: employee.hrms_id.clone(),
            name: employee.name.clone(),
            emp_number: employee.emp_number.clone(),
            date_of_birth: employee.date_of_birth.clone(),
            category: employee.category,
            designation: application.designation.clone(),
            blood_group: application.blood_group.clone(),
            mobile_number: application.mobile_number.clone(),
            address: application.address.clone(),
            identification_mark: application.identification_mark.clone(),
            photo_path: application.photo_path.clone(),
            signature_path: application.signature_path.clone(),
            issued_at: shared::util::millis_to_rfc3339(icard.generated_at),
        }
    }
}

/// Produces the printable artifact for an issued card and returns its reference
#[async_trait]
pub trait CardRenderer: Send + Sync {
    async fn render(&self, sheet: &CardSheet) -> Result<String, ArtifactError>;
}

/// Writes `<output_dir>/<card number>.json`
#[derive(Debug, Clone)]
pub struct FileCardRenderer {
    output_dir: PathBuf,
}

impl FileCardRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn file_name(icard_number: &str) -> String {
        let stem: String = icard_number
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("{stem}.json")
    }
}

#[async_trait]
impl CardRenderer for FileCardRenderer {
    async fn render(&self, sheet: &CardSheet) -> Result<String, ArtifactError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(Self::file_name(&sheet.icard_number));
        let body = serde_json::to_vec_pretty(sheet)?;
        tokio::fs::write(&path, body).await?;
        Ok(path.to_string_lossy().into_owned())
    }
}

/// Render one card and record its reference.
///
/// Returns `None` when another producer recorded a reference first. A failed
/// attempt is stamped on the card so retry scans rotate through failures.
pub async fn produce_for_card(
    pool: &SqlitePool,
    renderer: &dyn CardRenderer,
    card: &Icard,
) -> Result<Option<String>, ArtifactError> {
    let result = render_and_record(pool, renderer, card).await;
    if result.is_err()
        && let Err(e) = icard::mark_artifact_attempt(pool, card.id, shared::util::now_millis()).await
    {
        tracing::warn!(icard_id = card.id, error = %e, "Failed to record artifact attempt");
    }
    result
}

async fn render_and_record(
    pool: &SqlitePool,
    renderer: &dyn CardRenderer,
    card: &Icard,
) -> Result<Option<String>, ArtifactError> {
    let employee = employee::find_by_hrms_id(pool, &card.hrms_id)
        .await?
        .ok_or_else(|| ArtifactError::MissingRecord(format!("employee {}", card.hrms_id)))?;
    let application = application::find_by_id(pool, card.application_id)
        .await?
        .ok_or_else(|| ArtifactError::MissingRecord(format!("application {}", card.application_id)))?;

    let sheet = CardSheet::new(card, &employee, &application);
    let path = renderer.render(&sheet).await?;

    if icard::set_pdf_path(pool, card.id, &path).await? == 0 {
        tracing::debug!(icard_id = card.id, "Artifact already recorded by another producer");
        return Ok(None);
    }
    tracing::info!(
        icard_id = card.id,
        icard_number = %card.icard_number,
        path = %path,
        "I-Card artifact produced"
    );
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_path_safe() {
        assert_eq!(FileCardRenderer::file_name("GAZ0007"), "GAZ0007.json");
        assert_eq!(FileCardRenderer::file_name("NR/NG/00042"), "NR_NG_00042.json");
    }

    #[tokio::test]
    async fn test_render_writes_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = FileCardRenderer::new(dir.path().join("icards"));
        let sheet = CardSheet {
            icard_number: "NG00001".to_string(),
            hrms_id: "E100".to_string(),
            name: "Asha Rao".to_string(),
            emp_number: "10001".to_string(),
            date_of_birth: "1985-04-12".to_string(),
            category: EmployeeCategory::NonGazetted,
            designation: "Technician".to_string(),
            blood_group: Some("O+".to_string()),
            mobile_number: None,
            address: None,
            identification_mark: None,
            photo_path: None,
            signature_path: None,
            issued_at: None,
        };

        let path = renderer.render(&sheet).await.unwrap();
        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["icard_number"], "NG00001");
        assert_eq!(written["category"], "non_gazetted");
    }
}
