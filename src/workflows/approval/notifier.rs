use tracing::info;

use super::domain::{ApproverRole, NotificationChannel};

/// Outbound hook that delivers an approval request to the chosen approver.
pub trait ApprovalNotifier: Send + Sync {
    fn notify(
        &self,
        role: ApproverRole,
        channel: NotificationChannel,
        message: &str,
    ) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Stand-in notifier that only records the request in the service log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl ApprovalNotifier for LoggingNotifier {
    fn notify(
        &self,
        role: ApproverRole,
        channel: NotificationChannel,
        message: &str,
    ) -> Result<(), NotifyError> {
        info!(
            approver = role.label(),
            channel = channel.as_str(),
            message,
            "sending approval request"
        );
        Ok(())
    }
}
