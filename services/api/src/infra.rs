use chrono::{DateTime, Utc};
use invoice_workflow::workflows::approval::{
    ApprovalNotifier, ApproverRole, NotificationChannel, NotifyError, RuleCatalog,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Arc<RuleCatalog>,
}

/// Prints approval requests for command-line runs.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ConsoleNotifier;

impl ApprovalNotifier for ConsoleNotifier {
    fn notify(
        &self,
        role: ApproverRole,
        channel: NotificationChannel,
        message: &str,
    ) -> Result<(), NotifyError> {
        println!(
            "Sending approval request to {} via {}: {}",
            role.label(),
            channel,
            message
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NotificationRecord {
    pub(crate) role: ApproverRole,
    pub(crate) channel: NotificationChannel,
    pub(crate) message: String,
    pub(crate) sent_at: DateTime<Utc>,
}

/// Keeps every dispatched request so demos can summarise them afterwards.
#[derive(Default, Clone)]
pub(crate) struct RecordingNotifier {
    records: Arc<Mutex<Vec<NotificationRecord>>>,
}

impl ApprovalNotifier for RecordingNotifier {
    fn notify(
        &self,
        role: ApproverRole,
        channel: NotificationChannel,
        message: &str,
    ) -> Result<(), NotifyError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| NotifyError::Transport("notification log poisoned".to_string()))?;
        guard.push(NotificationRecord {
            role,
            channel,
            message: message.to_string(),
            sent_at: Utc::now(),
        });
        Ok(())
    }
}

impl RecordingNotifier {
    pub(crate) fn records(&self) -> Vec<NotificationRecord> {
        self.records
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}
