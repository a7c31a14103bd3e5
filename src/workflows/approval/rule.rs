use super::conditions::Condition;
use super::domain::{ApprovalAction, Invoice};

/// Conjunction of conditions that routes an invoice to an approval action.
///
/// Lower `priority` values are checked first. A rule without conditions
/// matches every invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRule {
    pub id: String,
    pub priority: i32,
    pub conditions: Vec<Condition>,
    pub action: ApprovalAction,
    pub description: String,
}

impl WorkflowRule {
    pub fn new(
        id: impl Into<String>,
        priority: i32,
        conditions: Vec<Condition>,
        action: ApprovalAction,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            priority,
            conditions,
            action,
            description: description.into(),
        }
    }

    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.evaluate(invoice))
    }

    pub fn condition_summary(&self) -> String {
        if self.conditions.is_empty() {
            return "(always)".to_string();
        }

        self.conditions
            .iter()
            .map(Condition::description)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
