use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use invoice_workflow::error::AppError;
use invoice_workflow::workflows::approval::{
    workflow_router, ApprovalNotifier, ApprovalWorkflowService, InvoiceCsvImporter,
    RuleEvaluator, WorkflowResponse,
};
use serde::Serialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Dry-run evaluation of a CSV export; no approvers are notified.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchEvaluationResponse {
    pub(crate) evaluated: usize,
    pub(crate) unmatched: usize,
    pub(crate) results: Vec<WorkflowResponse>,
}

pub(crate) fn with_operational_routes<N>(service: Arc<ApprovalWorkflowService<N>>) -> Router
where
    N: ApprovalNotifier + 'static,
{
    workflow_router(service)
        .route("/workflow/batch", post(batch_evaluation_endpoint))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn batch_evaluation_endpoint(
    Extension(state): Extension<AppState>,
    body: String,
) -> Result<Json<BatchEvaluationResponse>, AppError> {
    let invoices = InvoiceCsvImporter::from_reader(Cursor::new(body.into_bytes()))?;
    let evaluator = RuleEvaluator::new(state.catalog.clone());

    let mut unmatched = 0;
    let results: Vec<WorkflowResponse> = invoices
        .iter()
        .map(|invoice| match evaluator.evaluate(invoice) {
            Ok(action) => WorkflowResponse::approved(&action),
            Err(err) => {
                unmatched += 1;
                WorkflowResponse::failure(err.to_string())
            }
        })
        .collect();

    Ok(Json(BatchEvaluationResponse {
        evaluated: results.len(),
        unmatched,
        results,
    }))
}
