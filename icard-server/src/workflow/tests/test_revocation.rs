use super::*;

fn revocation(reason: &str, detail: Option<&str>) -> RevocationCreate {
    RevocationCreate {
        reason: reason.to_string(),
        detailed_reason: detail.map(str::to_string),
    }
}

// ========================================================================
//  吊销流程
// ========================================================================

#[tokio::test]
async fn test_revocation_approval_revokes_card() {
    let env = setup().await;
    create_employee(&env, "G400", EmployeeCategory::Gazetted).await;
    let card = issue_card_for(&env, "G400", None).await.icard.unwrap();

    let request = env
        .service
        .create_revocation_request(&dealer_ctx(), card.id, &revocation("Retirement", Some("Superannuated 31-05")))
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.reason, "Retirement: Superannuated 31-05");
    assert_eq!(request.requested_by, "dealer@example.org");

    let pending = env.service.pending_revocations(&awo_ctx()).await.unwrap();
    assert_eq!(pending.len(), 1);

    let outcome = env
        .service
        .awo_revocation_decision(&awo_ctx(), request.id, &approve("Card surrendered"))
        .await
        .unwrap();
    assert_eq!(outcome.request.status, RequestStatus::Approved);
    assert_eq!(outcome.request.awo_remarks.as_deref(), Some("Card surrendered"));
    assert!(outcome.request.awo_reviewed_at.is_some());

    assert_eq!(outcome.icard.status, IcardStatus::Revoked);
    assert!(!outcome.icard.is_current);
    assert!(outcome.icard.revoked_at.is_some());
    assert_eq!(outcome.icard.revocation_reason.as_deref(), Some("Card surrendered"));

    assert!(icard::find_current_by_employee(&env.pool, "G400").await.unwrap().is_none());
    assert!(env.service.pending_revocations(&awo_ctx()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_revocation_rejection_keeps_card_active() {
    let env = setup().await;
    create_employee(&env, "G401", EmployeeCategory::Gazetted).await;
    let card = issue_card_for(&env, "G401", None).await.icard.unwrap();

    let request = env
        .service
        .create_revocation_request(&dealer_ctx(), card.id, &revocation("Transfer", None))
        .await
        .unwrap();
    assert_eq!(request.reason, "Transfer");

    let outcome = env
        .service
        .awo_revocation_decision(&awo_ctx(), request.id, &reject("Transfer order cancelled"))
        .await
        .unwrap();
    assert_eq!(outcome.request.status, RequestStatus::Rejected);
    assert_eq!(outcome.icard.status, IcardStatus::Active);
    assert!(outcome.icard.is_current);
    assert_eq!(outcome.icard.revoked_at, None);

    // Decided requests cannot be decided again
    let err = env
        .service
        .awo_revocation_decision(&awo_ctx(), request.id, &approve("Changed my mind"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::InvalidTransition(ErrorCode::RevocationAlreadyDecided, _)
    ));
}

#[tokio::test]
async fn test_revocation_preconditions() {
    let env = setup().await;
    create_employee(&env, "G402", EmployeeCategory::Gazetted).await;
    let card = issue_card_for(&env, "G402", None).await.icard.unwrap();

    // Missing card
    let err = env
        .service
        .create_revocation_request(&dealer_ctx(), 9999, &revocation("Lost", None))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(ErrorCode::IcardNotFound, _)));

    // Empty reason
    let err = env
        .service
        .create_revocation_request(&dealer_ctx(), card.id, &revocation("  ", Some("detail only")))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::ValidationFailed(..)));

    // One pending request per card
    let request = env
        .service
        .create_revocation_request(&dealer_ctx(), card.id, &revocation("Retirement", None))
        .await
        .unwrap();
    let err = env
        .service
        .create_revocation_request(&dealer_ctx(), card.id, &revocation("Retirement", None))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition(ErrorCode::AlreadyExists, _)));

    // Revoked card: no further requests
    env.service
        .awo_revocation_decision(&awo_ctx(), request.id, &approve("Retired"))
        .await
        .unwrap();
    let err = env
        .service
        .create_revocation_request(&dealer_ctx(), card.id, &revocation("Retirement", None))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition(ErrorCode::IcardNotActive, _)));
}

#[tokio::test]
async fn test_revocation_role_gating() {
    let env = setup().await;
    create_employee(&env, "G403", EmployeeCategory::Gazetted).await;
    let card = issue_card_for(&env, "G403", None).await.icard.unwrap();

    let err = env
        .service
        .create_revocation_request(&employee_ctx("G403"), card.id, &revocation("Lost", None))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));

    let request = env
        .service
        .create_revocation_request(&dealer_ctx(), card.id, &revocation("Lost", None))
        .await
        .unwrap();
    let err = env
        .service
        .awo_revocation_decision(&dealer_ctx(), request.id, &approve("Dealer decides"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));

    let err = env
        .service
        .awo_revocation_decision(&awo_ctx(), request.id, &approve(""))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::ValidationFailed(ErrorCode::RemarksRequired, _)));
}

/// A stale request against an already revoked card rolls back as a whole.
#[tokio::test]
async fn test_card_guard_failure_rolls_back_request_decision() {
    let env = setup().await;
    create_employee(&env, "G404", EmployeeCategory::Gazetted).await;
    let card = issue_card_for(&env, "G404", None).await.icard.unwrap();

    let first = env
        .service
        .create_revocation_request(&dealer_ctx(), card.id, &revocation("Retirement", None))
        .await
        .unwrap();
    // Second pending request slipped in through the repository directly
    let stale = icard_request::insert(
        &env.pool,
        card.id,
        shared::models::RequestType::Revoke,
        "Duplicate entry",
        "dealer2@example.org",
    )
    .await
    .unwrap();

    env.service
        .awo_revocation_decision(&awo_ctx(), first.id, &approve("Retired"))
        .await
        .unwrap();

    let err = env
        .service
        .awo_revocation_decision(&awo_ctx(), stale.id, &approve("Retired again"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition(ErrorCode::IcardNotActive, _)));

    // Request decision was rolled back with the card guard
    let stale = icard_request::find_by_id(&env.pool, stale.id).await.unwrap().unwrap();
    assert_eq!(stale.status, RequestStatus::Pending);
    assert_eq!(stale.awo_remarks, None);

    // It can still be rejected
    let outcome = env
        .service
        .awo_revocation_decision(&awo_ctx(), stale.id, &reject("Duplicate of earlier request"))
        .await
        .unwrap();
    assert_eq!(outcome.request.status, RequestStatus::Rejected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_revocation_decisions() {
    let env = setup().await;
    create_employee(&env, "G405", EmployeeCategory::Gazetted).await;
    let card = issue_card_for(&env, "G405", None).await.icard.unwrap();
    let request = env
        .service
        .create_revocation_request(&dealer_ctx(), card.id, &revocation("Lost", None))
        .await
        .unwrap();

    let approve_decision = approve("Confirmed lost");
    let reject_decision = reject("Card found");
    let (a, b) = tokio::join!(
        env.service.apply_revocation_decision(&request, &approve_decision),
        env.service.apply_revocation_decision(&request, &reject_decision),
    );

    let approved_won = match (&a, &b) {
        (Ok(_), Err(e)) | (Err(e), Ok(_)) => {
            assert!(matches!(
                e,
                WorkflowError::AlreadyReviewed(ErrorCode::RevocationAlreadyDecided, _)
            ));
            a.is_ok()
        }
        other => panic!("expected exactly one winner, got {other:?}"),
    };

    // Card state follows the winner
    let stored = icard::find_by_id(&env.pool, card.id).await.unwrap().unwrap();
    if approved_won {
        assert_eq!(stored.status, IcardStatus::Revoked);
        assert!(!stored.is_current);
    } else {
        assert_eq!(stored.status, IcardStatus::Active);
        assert!(stored.is_current);
    }
}

#[tokio::test]
async fn test_detailed_reason_limit_counts_characters() {
    let env = setup().await;
    create_employee(&env, "G407", EmployeeCategory::Gazetted).await;
    let card = issue_card_for(&env, "G407", None).await.icard.unwrap();

    // 501 chars but over 1000 bytes
    let over = "é".repeat(501);
    let err = env
        .service
        .create_revocation_request(&dealer_ctx(), card.id, &revocation("Transfer", Some(&over)))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::ValidationFailed(ErrorCode::ValidationFailed, _)));
    assert!(err.to_string().contains("501 chars"));

    // 300 chars, 600 bytes
    let detail = "é".repeat(300);
    let request = env
        .service
        .create_revocation_request(&dealer_ctx(), card.id, &revocation("Transfer", Some(&detail)))
        .await
        .unwrap();
    assert_eq!(request.reason, format!("Transfer: {detail}"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_revocation_requests_single_pending() {
    let env = setup().await;
    create_employee(&env, "G408", EmployeeCategory::Gazetted).await;
    let card = issue_card_for(&env, "G408", None).await.icard.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = env.service.clone();
            let payload = revocation("Transfer", Some(&format!("Desk {i}")));
            tokio::spawn(async move {
                service
                    .create_revocation_request(&dealer_ctx(), card.id, &payload)
                    .await
            })
        })
        .collect();

    let mut created = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(request) => created.push(request),
            Err(e) => assert_eq!(e.code(), ErrorCode::AlreadyExists, "unexpected error: {e}"),
        }
    }
    assert_eq!(created.len(), 1);

    let pending = icard_request::find_by_status(&env.pool, RequestStatus::Pending).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, created[0].id);

    let outcome = env
        .service
        .awo_revocation_decision(&awo_ctx(), created[0].id, &approve("Transfer confirmed"))
        .await
        .unwrap();
    assert_eq!(outcome.request.status, RequestStatus::Approved);
    assert_eq!(outcome.icard.status, IcardStatus::Revoked);
    assert!(env.service.pending_revocations(&awo_ctx()).await.unwrap().is_empty());
}

// ========================================================================
//  吊销后重新办卡
// ========================================================================

#[tokio::test]
async fn test_new_card_after_revocation() {
    let env = setup().await;
    create_employee(&env, "E406", EmployeeCategory::NonGazetted).await;
    let officer = create_officer(&env, "co@example.org").await;

    let old = issue_card_for(&env, "E406", Some(&officer)).await.icard.unwrap();
    let request = env
        .service
        .create_revocation_request(&dealer_ctx(), old.id, &revocation("Lost", Some("FIR 112/24")))
        .await
        .unwrap();
    env.service
        .awo_revocation_decision(&awo_ctx(), request.id, &approve("Lost card revoked"))
        .await
        .unwrap();

    let new = issue_card_for(&env, "E406", Some(&officer)).await.icard.unwrap();
    assert_eq!(new.icard_number, "NG00002");
    assert!(new.is_current);

    let history = icard::find_by_employee(&env.pool, "E406").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.iter().filter(|c| c.is_current).count(), 1);
    let old = history.iter().find(|c| c.id == old.id).unwrap();
    assert_eq!(old.status, IcardStatus::Revoked);
    assert!(!old.is_current);
}
