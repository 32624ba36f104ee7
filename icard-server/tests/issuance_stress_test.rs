//! 发卡压力测试 - 多名员工同时走完审批链
//!
//! 使用 ServerState::initialize 完整初始化 (迁移、渲染器、流程服务)
//!
//! 审批交叉执行：每个员工一个任务，CO / Dealer / AWO 各阶段并发推进，
//! 最后核对卡号连续、唯一，每人恰好一张当前卡。

use icard_server::auth::JwtConfig;
use icard_server::db::repository::{controlling_officer, employee, icard, sequence};
use icard_server::{AuthContext, Config, Role, ServerState};
use shared::models::{
    ApplicationCreate, ApplicationStatus, ControllingOfficerCreate, EmployeeCategory,
    EmployeeCreate, ReviewAction, ReviewDecision,
};
use std::collections::HashSet;
use std::time::Instant;

const NON_GAZETTED: usize = 40;
const GAZETTED: usize = 20;

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "stress-test-secret-stress-test-secret-01".to_string(),
        expiration_minutes: 60,
        issuer: "icard-server".to_string(),
        audience: "icard-clients".to_string(),
    }
}

fn approve(remarks: &str) -> ReviewDecision {
    ReviewDecision {
        action: ReviewAction::Approve,
        remarks: remarks.to_string(),
    }
}

fn form(hrms_id: &str, controlling_officer_id: Option<i64>) -> ApplicationCreate {
    ApplicationCreate {
        hrms_id: hrms_id.to_string(),
        designation: "Sr. Clerk".to_string(),
        blood_group: Some("O+".to_string()),
        mobile_number: None,
        address: None,
        identification_mark: None,
        photo_path: None,
        signature_path: None,
        controlling_officer_id,
    }
}

/// 单个员工完整审批链，返回卡号
async fn run_chain(
    state: ServerState,
    hrms_id: String,
    officer: Option<(String, i64)>,
) -> String {
    let workflow = &state.workflow;
    let app = workflow
        .submit_application(
            &AuthContext::new(hrms_id.clone(), Role::Employee),
            form(&hrms_id, officer.as_ref().map(|(_, id)| *id)),
        )
        .await
        .unwrap();

    if let Some((email, id)) = officer {
        workflow
            .co_review(
                &AuthContext::controlling_officer(email, id),
                app.id,
                &approve("Service record verified"),
            )
            .await
            .unwrap();
    }

    workflow
        .dealer_review(
            &AuthContext::new("dealer@example.org", Role::Dealer),
            app.id,
            &approve("Documents in order"),
        )
        .await
        .unwrap();

    let outcome = workflow
        .awo_decision(
            &AuthContext::new("awo@example.org", Role::Awo),
            app.id,
            &approve("Approved for issue"),
        )
        .await
        .unwrap();
    assert_eq!(outcome.application.current_status, ApplicationStatus::Approved);
    outcome.icard.unwrap().icard_number
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_issuance_numbers_are_dense_and_unique() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_str().unwrap(), 0, jwt_config());
    let state = ServerState::initialize(&config).await.unwrap();

    let officer = controlling_officer::create(
        &state.pool,
        &ControllingOfficerCreate {
            name: "Divisional Officer".to_string(),
            email: "co@example.org".to_string(),
            designation: None,
            department_id: None,
        },
    )
    .await
    .unwrap();

    let mut employees = Vec::new();
    for i in 0..NON_GAZETTED + GAZETTED {
        let category = if i < NON_GAZETTED {
            EmployeeCategory::NonGazetted
        } else {
            EmployeeCategory::Gazetted
        };
        let hrms_id = format!("H{i:04}");
        employee::create(
            &state.pool,
            &EmployeeCreate {
                hrms_id: hrms_id.clone(),
                name: format!("Employee {i}"),
                emp_number: format!("EMP{i:05}"),
                date_of_birth: "1985-01-01".to_string(),
                category,
                department_id: None,
            },
        )
        .await
        .unwrap();
        employees.push((hrms_id, category));
    }

    let start = Instant::now();
    let mut handles = Vec::new();
    for (hrms_id, category) in &employees {
        let officer = match category {
            EmployeeCategory::NonGazetted => Some((officer.email.clone(), officer.id)),
            EmployeeCategory::Gazetted => None,
        };
        handles.push(tokio::spawn(run_chain(state.clone(), hrms_id.clone(), officer)));
    }

    let numbers: Vec<String> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();
    println!(
        "issued {} cards in {:?}",
        numbers.len(),
        start.elapsed()
    );

    let unique: HashSet<&String> = numbers.iter().collect();
    assert_eq!(unique.len(), numbers.len());

    let expected_ng: HashSet<String> = (1..=NON_GAZETTED).map(|n| format!("NG{n:05}")).collect();
    let expected_gaz: HashSet<String> = (1..=GAZETTED).map(|n| format!("GAZ{n:04}")).collect();
    let issued: HashSet<String> = numbers.into_iter().collect();
    assert_eq!(issued, &expected_ng | &expected_gaz);

    assert_eq!(
        sequence::peek(&state.pool, "NG").await.unwrap(),
        Some(NON_GAZETTED as i64 + 1)
    );
    assert_eq!(
        sequence::peek(&state.pool, "GAZ").await.unwrap(),
        Some(GAZETTED as i64 + 1)
    );

    for (hrms_id, _) in &employees {
        let current = icard::find_current_by_employee(&state.pool, hrms_id)
            .await
            .unwrap();
        assert!(current.is_some(), "{hrms_id} has no current card");
        assert_eq!(icard::find_by_employee(&state.pool, hrms_id).await.unwrap().len(), 1);
    }

    // Every card got its artifact written after commit
    let missing = icard::find_missing_artifacts(&state.pool, 100).await.unwrap();
    assert!(missing.is_empty());
}
