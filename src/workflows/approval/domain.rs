use serde::Serialize;
use std::fmt;

use super::notifier::{ApprovalNotifier, NotifyError};

/// Invoice submitted for approval routing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub amount: f64,
    pub department: String,
    pub requires_manager_approval: bool,
}

impl Invoice {
    pub fn new(amount: f64, department: impl Into<String>, requires_manager_approval: bool) -> Self {
        Self {
            amount,
            department: department.into(),
            requires_manager_approval,
        }
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invoice{{amount={:?}, department='{}', requiresManagerApproval={}}}",
            self.amount, self.department, self.requires_manager_approval
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApproverRole {
    FinanceTeam,
    FinanceManager,
    Cfo,
    Cmo,
}

impl ApproverRole {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::FinanceTeam,
            Self::FinanceManager,
            Self::Cfo,
            Self::Cmo,
        ]
    }

    /// Wire name used in API responses.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FinanceTeam => "FINANCE_TEAM",
            Self::FinanceManager => "FINANCE_MANAGER",
            Self::Cfo => "CFO",
            Self::Cmo => "CMO",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FinanceTeam => "Finance Team",
            Self::FinanceManager => "Finance Manager",
            Self::Cfo => "CFO",
            Self::Cmo => "CMO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    Slack,
    Email,
}

impl NotificationChannel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slack => "SLACK",
            Self::Email => "EMAIL",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who to notify, and how, once a rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalAction {
    pub approver_role: ApproverRole,
    pub channel: NotificationChannel,
    pub message: String,
}

impl ApprovalAction {
    pub fn new(
        approver_role: ApproverRole,
        channel: NotificationChannel,
        message: impl Into<String>,
    ) -> Self {
        Self {
            approver_role,
            channel,
            message: message.into(),
        }
    }

    /// Hands the approval request to the notifier.
    pub fn execute(&self, notifier: &dyn ApprovalNotifier) -> Result<(), NotifyError> {
        notifier.notify(self.approver_role, self.channel, &self.message)
    }
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via {}: {}",
            self.approver_role.label(),
            self.channel,
            self.message
        )
    }
}
