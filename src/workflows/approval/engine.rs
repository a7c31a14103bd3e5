use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::catalog::RuleCatalog;
use super::domain::{ApprovalAction, Invoice};
use super::rule::WorkflowRule;

/// Raised when the catalog is exhausted without a matching rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("No matching workflow rule found for invoice: {invoice}")]
    NoMatchingRule { invoice: String },
}

/// First-match-wins evaluator over a shared, read-only catalog.
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    catalog: Arc<RuleCatalog>,
}

impl RuleEvaluator {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Returns the action of the lowest-priority rule whose conditions all hold.
    pub fn evaluate(&self, invoice: &Invoice) -> Result<ApprovalAction, EvaluationError> {
        for rule in self.catalog.rules_by_priority() {
            let matched = rule.matches(invoice);
            debug!(
                rule_id = %rule.id,
                priority = rule.priority,
                conditions = %rule.condition_summary(),
                matched,
                "checked workflow rule"
            );

            if matched {
                info!(rule_id = %rule.id, %invoice, action = %rule.action, "workflow rule matched");
                return Ok(rule.action.clone());
            }
        }

        Err(EvaluationError::NoMatchingRule {
            invoice: invoice.to_string(),
        })
    }

    /// Walks the catalog like [`evaluate`](Self::evaluate) but records every
    /// checked rule and the outcome of each of its conditions.
    pub fn explain(&self, invoice: &Invoice) -> EvaluationTrace {
        let mut checks = Vec::new();
        let mut matched = None;

        for rule in self.catalog.rules_by_priority() {
            let check = RuleCheck::run(rule, invoice);
            let hit = check.matched;
            checks.push(check);

            if hit {
                matched = Some(MatchedRule {
                    rule_id: rule.id.clone(),
                    action: rule.action.clone(),
                });
                break;
            }
        }

        EvaluationTrace {
            invoice: invoice.clone(),
            checks,
            matched,
        }
    }
}

/// Diagnostic record of an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationTrace {
    pub invoice: Invoice,
    pub checks: Vec<RuleCheck>,
    pub matched: Option<MatchedRule>,
}

impl EvaluationTrace {
    pub fn matched_rule(&self) -> Option<&str> {
        self.matched.as_ref().map(|hit| hit.rule_id.as_str())
    }

    pub fn into_result(self) -> Result<ApprovalAction, EvaluationError> {
        match self.matched {
            Some(hit) => Ok(hit.action),
            None => Err(EvaluationError::NoMatchingRule {
                invoice: self.invoice.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRule {
    pub rule_id: String,
    pub action: ApprovalAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCheck {
    pub rule_id: String,
    pub priority: i32,
    pub description: String,
    pub conditions: Vec<ConditionCheck>,
    pub matched: bool,
}

impl RuleCheck {
    fn run(rule: &WorkflowRule, invoice: &Invoice) -> Self {
        let conditions: Vec<ConditionCheck> = rule
            .conditions
            .iter()
            .map(|condition| ConditionCheck {
                description: condition.description(),
                satisfied: condition.evaluate(invoice),
            })
            .collect();
        let matched = conditions.iter().all(|check| check.satisfied);

        Self {
            rule_id: rule.id.clone(),
            priority: rule.priority,
            description: rule.description.clone(),
            conditions,
            matched,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionCheck {
    pub description: String,
    pub satisfied: bool,
}
