use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use super::domain::ApprovalAction;
use super::notifier::ApprovalNotifier;
use super::service::{
    ApprovalWorkflowService, ValidationError, WorkflowRequest, WorkflowServiceError,
};

/// Uniform response body for `POST /workflow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowResponse {
    pub fn approved(action: &ApprovalAction) -> Self {
        Self {
            success: true,
            approver_role: Some(action.approver_role.as_str().to_string()),
            channel: Some(action.channel.as_str().to_string()),
            message: Some(action.message.clone()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            approver_role: None,
            channel: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Router exposing invoice evaluation and its health check.
pub fn workflow_router<N>(service: Arc<ApprovalWorkflowService<N>>) -> Router
where
    N: ApprovalNotifier + 'static,
{
    Router::new()
        .route("/workflow", post(execute_handler::<N>))
        .route("/workflow/health", get(health_handler))
        .with_state(service)
}

pub(crate) async fn execute_handler<N>(
    State(service): State<Arc<ApprovalWorkflowService<N>>>,
    body: Bytes,
) -> Response
where
    N: ApprovalNotifier + 'static,
{
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(err) => return failure(StatusCode::BAD_REQUEST, err.to_string()),
    };

    match service.process(request) {
        Ok(action) => (StatusCode::OK, Json(WorkflowResponse::approved(&action))).into_response(),
        Err(WorkflowServiceError::Validation(err)) => {
            failure(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(WorkflowServiceError::Evaluation(err)) => {
            warn!(error = %err, "invoice matched no workflow rule");
            failure(StatusCode::NOT_FOUND, err.to_string())
        }
        Err(other) => {
            error!(error = %other, "workflow execution failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {other}"),
            )
        }
    }
}

pub(crate) async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

fn parse_request(body: &[u8]) -> Result<Option<WorkflowRequest>, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice::<Option<WorkflowRequest>>(body)
        .map_err(|err| ValidationError::MalformedBody(err.to_string()))
}

fn failure(status: StatusCode, error: String) -> Response {
    (status, Json(WorkflowResponse::failure(error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::approval::catalog::RuleCatalog;
    use crate::workflows::approval::notifier::LoggingNotifier;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn router(catalog: RuleCatalog) -> Router {
        let service = ApprovalWorkflowService::new(Arc::new(catalog), Arc::new(LoggingNotifier));
        workflow_router(Arc::new(service))
    }

    async fn post_workflow(router: Router, body: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::post("/workflow")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let payload = serde_json::from_slice(&bytes).expect("json body");
        (status, payload)
    }

    #[tokio::test]
    async fn matching_invoice_returns_action() {
        let (status, payload) = post_workflow(
            router(RuleCatalog::standard()),
            r#"{"amount": 15000, "department": "marketing", "requiresManagerApproval": false}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            payload,
            json!({
                "success": true,
                "approverRole": "CMO",
                "channel": "EMAIL",
                "message": "High value marketing invoice requires CMO approval",
            })
        );
    }

    #[tokio::test]
    async fn unknown_fields_are_ignored() {
        let (status, payload) = post_workflow(
            router(RuleCatalog::standard()),
            r#"{"amount": 7000, "department": "ops", "requiresManagerApproval": true, "vendor": "ACME"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["approverRole"], "FINANCE_MANAGER");
    }

    #[tokio::test]
    async fn null_amount_and_flag_fall_back_to_defaults() {
        for body in [
            r#"{"amount": null, "department": "hr"}"#,
            r#"{"amount": null, "department": "hr", "requiresManagerApproval": null}"#,
        ] {
            let (status, payload) = post_workflow(router(RuleCatalog::standard()), body).await;

            assert_eq!(status, StatusCode::OK, "body {body:?}");
            assert_eq!(payload["approverRole"], "FINANCE_TEAM");
            assert_eq!(payload["channel"], "SLACK");
        }
    }

    #[tokio::test]
    async fn invalid_input_is_a_bad_request() {
        for (body, message) in [
            ("", "Request body is required"),
            ("null", "Request body is required"),
            (r#"{"amount": -1, "department": "hr"}"#, "Amount must be non-negative"),
            (r#"{"amount": 10, "department": ""}"#, "Department is required"),
            (r#"{"amount": 10}"#, "Department is required"),
        ] {
            let (status, payload) = post_workflow(router(RuleCatalog::standard()), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
            assert_eq!(payload, json!({ "success": false, "error": message }));
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (status, payload) =
            post_workflow(router(RuleCatalog::standard()), r#"{"amount": "lots""#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["success"], false);
        assert!(payload["error"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn exhausted_catalog_is_not_found() {
        let (status, payload) = post_workflow(
            router(RuleCatalog::empty()),
            r#"{"amount": 100, "department": "hr", "requiresManagerApproval": false}"#,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["success"], false);
        assert!(payload["error"]
            .as_str()
            .unwrap_or_default()
            .starts_with("No matching workflow rule found"));
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let response = router(RuleCatalog::standard())
            .oneshot(
                Request::get("/workflow/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let payload: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(payload, json!({ "status": "healthy" }));
    }
}
