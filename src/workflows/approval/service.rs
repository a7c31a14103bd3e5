use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use tracing::info;

use super::catalog::RuleCatalog;
use super::domain::{ApprovalAction, Invoice};
use super::engine::{EvaluationError, RuleEvaluator};
use super::notifier::{ApprovalNotifier, NotifyError};

/// Inbound payload for `POST /workflow`.
///
/// Missing or `null` numeric and boolean fields fall back to zero/false;
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_manager_approval: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::<T>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

impl WorkflowRequest {
    pub fn new(amount: f64, department: impl Into<String>, requires_manager_approval: bool) -> Self {
        Self {
            amount,
            department: Some(department.into()),
            requires_manager_approval,
        }
    }

    pub fn into_invoice(self) -> Result<Invoice, ValidationError> {
        if !self.amount.is_finite() {
            return Err(ValidationError::NonFiniteAmount);
        }
        if self.amount < 0.0 {
            return Err(ValidationError::NegativeAmount);
        }

        let department = match self.department {
            Some(department) if !department.trim().is_empty() => department,
            _ => return Err(ValidationError::MissingDepartment),
        };

        Ok(Invoice {
            amount: self.amount,
            department,
            requires_manager_approval: self.requires_manager_approval,
        })
    }
}

/// Input rejected before any rule is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Request body is required")]
    MissingBody,
    #[error("Invalid request body: {0}")]
    MalformedBody(String),
    #[error("Amount must be non-negative")]
    NegativeAmount,
    #[error("Amount must be a finite number")]
    NonFiniteAmount,
    #[error("Department is required")]
    MissingDepartment,
}

/// Error raised by the approval workflow service.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Notification(#[from] NotifyError),
}

/// Validates requests, routes them through the evaluator and notifies the approver.
pub struct ApprovalWorkflowService<N> {
    evaluator: RuleEvaluator,
    notifier: Arc<N>,
    explain_evaluations: bool,
}

impl<N> ApprovalWorkflowService<N>
where
    N: ApprovalNotifier + 'static,
{
    pub fn new(catalog: Arc<RuleCatalog>, notifier: Arc<N>) -> Self {
        Self {
            evaluator: RuleEvaluator::new(catalog),
            notifier,
            explain_evaluations: false,
        }
    }

    /// Log the full rule trace of every request at INFO.
    pub fn with_explain(mut self, explain_evaluations: bool) -> Self {
        self.explain_evaluations = explain_evaluations;
        self
    }

    pub fn evaluator(&self) -> &RuleEvaluator {
        &self.evaluator
    }

    /// Runs a request end to end. `None` stands for an absent or `null` body.
    pub fn process(
        &self,
        request: Option<WorkflowRequest>,
    ) -> Result<ApprovalAction, WorkflowServiceError> {
        let request = request.ok_or(ValidationError::MissingBody)?;
        let invoice = request.into_invoice()?;
        self.process_invoice(&invoice)
    }

    pub fn process_invoice(
        &self,
        invoice: &Invoice,
    ) -> Result<ApprovalAction, WorkflowServiceError> {
        let action = if self.explain_evaluations {
            let trace = self.evaluator.explain(invoice);
            for check in &trace.checks {
                info!(
                    rule_id = %check.rule_id,
                    description = %check.description,
                    matched = check.matched,
                    "explain"
                );
            }
            trace.into_result()?
        } else {
            self.evaluator.evaluate(invoice)?
        };

        action.execute(self.notifier.as_ref())?;
        Ok(action)
    }
}
