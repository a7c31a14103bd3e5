//! Invoice approval routing: a priority-ordered rule catalog, a
//! first-match-wins evaluator, and the HTTP surface around them.

pub mod catalog;
pub mod conditions;
pub mod domain;
pub mod engine;
pub mod import;
pub mod notifier;
pub mod router;
pub mod rule;
pub mod service;

pub use catalog::RuleCatalog;
pub use conditions::{ComparisonOperator, Condition};
pub use domain::{ApprovalAction, ApproverRole, Invoice, NotificationChannel};
pub use engine::{ConditionCheck, EvaluationError, EvaluationTrace, RuleCheck, RuleEvaluator};
pub use import::{InvoiceCsvImporter, InvoiceImportError};
pub use notifier::{ApprovalNotifier, LoggingNotifier, NotifyError};
pub use router::{workflow_router, WorkflowResponse};
pub use rule::WorkflowRule;
pub use service::{ApprovalWorkflowService, ValidationError, WorkflowRequest, WorkflowServiceError};
