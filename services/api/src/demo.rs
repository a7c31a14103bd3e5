use crate::infra::{ConsoleNotifier, RecordingNotifier};
use clap::Args;
use invoice_workflow::error::AppError;
use invoice_workflow::workflows::approval::{
    ApprovalWorkflowService, EvaluationTrace, Invoice, InvoiceCsvImporter, LoggingNotifier,
    RuleCatalog, RuleEvaluator, WorkflowRequest, WorkflowServiceError,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Invoice amount (must be non-negative)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) amount: f64,
    /// Department that raised the invoice
    #[arg(long)]
    pub(crate) department: String,
    /// Flag the invoice as requiring manager approval
    #[arg(long)]
    pub(crate) requires_manager_approval: bool,
    /// Print every rule checked and each condition outcome
    #[arg(long)]
    pub(crate) explain: bool,
    /// Print the evaluation trace as JSON (implies --explain)
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with amount,department,requires_manager_approval columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

/// Reference invoices, including both band boundaries.
const DEMO_INVOICES: [(f64, &str, bool); 7] = [
    (15_000.0, "marketing", false),
    (15_000.0, "engineering", false),
    (7_000.0, "operations", true),
    (7_000.0, "operations", false),
    (3_000.0, "hr", false),
    (10_000.0, "sales", false),
    (5_000.0, "sales", false),
];

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        amount,
        department,
        requires_manager_approval,
        explain,
        json,
    } = args;

    let request = WorkflowRequest::new(amount, department, requires_manager_approval);
    let invoice = match request.into_invoice() {
        Ok(invoice) => invoice,
        Err(err) => {
            println!("Invoice rejected: {err}");
            return Ok(());
        }
    };

    let catalog = Arc::new(RuleCatalog::standard());
    if explain || json {
        let trace = RuleEvaluator::new(catalog.clone()).explain(&invoice);
        if json {
            match serde_json::to_string_pretty(&trace) {
                Ok(encoded) => println!("{encoded}"),
                Err(err) => println!("Evaluation trace unavailable: {err}"),
            }
        } else {
            render_trace(&trace);
        }
    }

    let service = ApprovalWorkflowService::new(catalog, Arc::new(ConsoleNotifier));
    if let Err(err) = service.process_invoice(&invoice) {
        println!("ERROR: {err}");
    }

    Ok(())
}

pub(crate) fn run_rules() {
    let catalog = RuleCatalog::standard();
    println!("Approval rules in evaluation order");
    for rule in catalog.rules_by_priority() {
        println!(
            "- [{}] priority {}: {}",
            rule.id, rule.priority, rule.description
        );
        println!("    conditions: {}", rule.condition_summary());
        println!("    action: {}", rule.action);
    }
}

pub(crate) fn run_demo() {
    println!("Invoice approval workflow demo");

    let catalog = Arc::new(RuleCatalog::standard());
    let evaluator = RuleEvaluator::new(catalog.clone());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = ApprovalWorkflowService::new(catalog, notifier.clone());

    for (amount, department, manager) in DEMO_INVOICES {
        let invoice = Invoice::new(amount, department, manager);
        println!();
        render_trace(&evaluator.explain(&invoice));
        if let Err(err) = service.process_invoice(&invoice) {
            println!("ERROR: {err}");
        }
    }

    let records = notifier.records();
    if records.is_empty() {
        println!("\nDispatched notifications: none");
        return;
    }

    println!("\nDispatched notifications");
    for record in records {
        println!(
            "- {} | {} via {} | {}",
            record.sent_at.format("%H:%M:%S%.3f"),
            record.role.label(),
            record.channel,
            record.message
        );
    }
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let invoices = InvoiceCsvImporter::from_path(&args.csv)?;
    let service = ApprovalWorkflowService::new(
        Arc::new(RuleCatalog::standard()),
        Arc::new(LoggingNotifier),
    );

    println!(
        "Evaluating {} invoice(s) from {}",
        invoices.len(),
        args.csv.display()
    );
    let mut unmatched = 0usize;
    for invoice in &invoices {
        match service.process_invoice(invoice) {
            Ok(action) => println!(
                "- {:.2} | {} | manager approval {} -> {} via {}",
                invoice.amount,
                invoice.department,
                invoice.requires_manager_approval,
                action.approver_role.as_str(),
                action.channel
            ),
            Err(WorkflowServiceError::Evaluation(err)) => {
                unmatched += 1;
                println!("- {err}");
            }
            Err(err) => println!("- {}: {err}", invoice),
        }
    }

    if unmatched > 0 {
        println!("{unmatched} invoice(s) matched no rule");
    }

    Ok(())
}

fn render_trace(trace: &EvaluationTrace) {
    println!("=== Evaluating Workflow ===");
    println!("{}", trace.invoice);

    for check in &trace.checks {
        println!("Checking rule {}: {}", check.rule_id, check.description);
        let conditions: Vec<String> = check
            .conditions
            .iter()
            .map(|condition| {
                let mark = if condition.satisfied { "yes" } else { "no" };
                format!("{} ({mark})", condition.description)
            })
            .collect();
        println!("  conditions: {}", conditions.join(", "));
        if check.matched {
            println!("  MATCH");
        } else {
            println!("  no match");
        }
    }

    if trace.matched.is_none() {
        println!("No rule matched");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoice_workflow::workflows::approval::ApproverRole;

    #[test]
    fn demo_invoices_cover_every_band() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service =
            ApprovalWorkflowService::new(Arc::new(RuleCatalog::standard()), notifier.clone());

        for (amount, department, manager) in DEMO_INVOICES {
            service
                .process_invoice(&Invoice::new(amount, department, manager))
                .expect("demo invoice routes");
        }

        let roles: Vec<ApproverRole> = notifier.records().iter().map(|r| r.role).collect();
        assert_eq!(
            roles,
            [
                ApproverRole::Cmo,
                ApproverRole::Cfo,
                ApproverRole::FinanceManager,
                ApproverRole::FinanceTeam,
                ApproverRole::FinanceTeam,
                ApproverRole::FinanceTeam,
                ApproverRole::FinanceTeam,
            ]
        );
    }
}
