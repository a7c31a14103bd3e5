use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use invoice_workflow::workflows::approval::{
    workflow_router, ApprovalAction, ApprovalNotifier, ApprovalWorkflowService, ApproverRole,
    EvaluationError, Invoice, NotificationChannel, NotifyError, RuleCatalog, RuleEvaluator,
    WorkflowResponse,
};
use std::sync::Arc;
use tower::ServiceExt;

fn evaluator() -> RuleEvaluator {
    RuleEvaluator::new(Arc::new(RuleCatalog::standard()))
}

fn route(amount: f64, department: &str, manager: bool) -> ApprovalAction {
    evaluator()
        .evaluate(&Invoice::new(amount, department, manager))
        .expect("standard catalog matches")
}

#[test]
fn executive_band_splits_on_marketing() {
    for amount in [10_000.01, 10_001.0, 15_000.0, 2_500_000.0] {
        for department in ["marketing", "Marketing", "MARKETING"] {
            for manager in [true, false] {
                let action = route(amount, department, manager);
                assert_eq!(action.approver_role, ApproverRole::Cmo);
                assert_eq!(action.channel, NotificationChannel::Email);
            }
        }
        for department in ["engineering", "sales", "marketing-emea"] {
            let action = route(amount, department, true);
            assert_eq!(action.approver_role, ApproverRole::Cfo);
            assert_eq!(action.channel, NotificationChannel::Slack);
        }
    }
}

#[test]
fn mid_band_follows_manager_flag() {
    for amount in [5_000.01, 7_000.0, 9_999.99, 10_000.0] {
        for department in ["marketing", "operations"] {
            let with_manager = route(amount, department, true);
            assert_eq!(
                (with_manager.approver_role, with_manager.channel),
                (ApproverRole::FinanceManager, NotificationChannel::Email)
            );

            let without_manager = route(amount, department, false);
            assert_eq!(
                (without_manager.approver_role, without_manager.channel),
                (ApproverRole::FinanceTeam, NotificationChannel::Slack)
            );
        }
    }
}

#[test]
fn small_invoices_always_go_to_finance_team() {
    for amount in [0.0, 0.01, 3_000.0, 4_999.99, 5_000.0] {
        for department in ["marketing", "hr"] {
            for manager in [true, false] {
                let action = route(amount, department, manager);
                assert_eq!(action.approver_role, ApproverRole::FinanceTeam);
                assert_eq!(action.channel, NotificationChannel::Slack);
                assert_eq!(action.message, "Standard invoice approval by Finance Team");
            }
        }
    }
}

#[test]
fn evaluation_is_repeatable() {
    let evaluator = evaluator();
    let invoice = Invoice::new(10_000.0, "sales", false);
    let first = evaluator.evaluate(&invoice).expect("matches");
    for _ in 0..10 {
        assert_eq!(evaluator.evaluate(&invoice).expect("matches"), first);
    }
}

#[test]
fn shared_catalog_serves_concurrent_evaluations() {
    let evaluator = evaluator();
    let handles: Vec<_> = (0..8u32)
        .map(|i| {
            let evaluator = evaluator.clone();
            std::thread::spawn(move || {
                let amount = 2_000.0 * f64::from(i);
                let manager = i % 2 == 0;
                evaluator
                    .evaluate(&Invoice::new(amount, "marketing", manager))
                    .map(|action| (amount, manager, action.approver_role))
            })
        })
        .collect();

    for handle in handles {
        let (amount, manager, role) = handle
            .join()
            .expect("thread completes")
            .expect("catalog matches");
        let expected = if amount > 10_000.0 {
            ApproverRole::Cmo
        } else if amount > 5_000.0 && manager {
            ApproverRole::FinanceManager
        } else {
            ApproverRole::FinanceTeam
        };
        assert_eq!(role, expected, "amount {amount}");
    }
}

#[test]
fn empty_catalog_rejects_every_invoice() {
    let evaluator = RuleEvaluator::new(Arc::new(RuleCatalog::empty()));
    for invoice in [
        Invoice::new(0.0, "hr", false),
        Invoice::new(15_000.0, "marketing", true),
    ] {
        assert!(matches!(
            evaluator.evaluate(&invoice),
            Err(EvaluationError::NoMatchingRule { .. })
        ));
    }
}

struct OfflineNotifier;

impl ApprovalNotifier for OfflineNotifier {
    fn notify(
        &self,
        _role: ApproverRole,
        _channel: NotificationChannel,
        _message: &str,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("slack webhook timed out".to_string()))
    }
}

#[tokio::test]
async fn notifier_failure_surfaces_as_internal_error() {
    let service = ApprovalWorkflowService::new(
        Arc::new(RuleCatalog::standard()),
        Arc::new(OfflineNotifier),
    );
    let response = workflow_router(Arc::new(service))
        .oneshot(
            Request::post("/workflow")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"amount": 3000, "department": "hr", "requiresManagerApproval": false}"#,
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body: WorkflowResponse = serde_json::from_slice(&bytes).expect("json body");
    assert!(!body.success);
    assert_eq!(
        body.error.as_deref(),
        Some("Internal server error: notification transport unavailable: slack webhook timed out")
    );
}
