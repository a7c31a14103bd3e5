use super::conditions::{ComparisonOperator, Condition};
use super::domain::{ApprovalAction, ApproverRole, NotificationChannel};
use super::rule::WorkflowRule;

/// Boundary between the small and mid-size invoice bands.
pub const STANDARD_LIMIT: f64 = 5_000.0;
/// Boundary above which executive approval is needed.
pub const EXECUTIVE_LIMIT: f64 = 10_000.0;

/// In-memory rule set, built once at startup and shared read-only afterwards.
///
/// Mutation needs `&mut self`, so once the catalog sits behind an `Arc` the
/// rules are frozen for every request that reads them. Rules are kept in
/// ascending priority as they are added, with ties in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<WorkflowRule>,
}

impl RuleCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rules(mut rules: Vec<WorkflowRule>) -> Self {
        rules.sort_by_key(|rule| rule.priority);
        Self { rules }
    }

    /// The reference approval matrix.
    ///
    /// Rule 2 carries no department condition: marketing invoices above the
    /// executive limit are claimed by rule 1 first.
    pub fn standard() -> Self {
        let rules = vec![
            WorkflowRule::new(
                "rule-1",
                1,
                vec![
                    Condition::amount(ComparisonOperator::GreaterThan, EXECUTIVE_LIMIT),
                    Condition::department("marketing"),
                ],
                ApprovalAction::new(
                    ApproverRole::Cmo,
                    NotificationChannel::Email,
                    "High value marketing invoice requires CMO approval",
                ),
                "Amount > 10000 AND Marketing Department → CMO via Email",
            ),
            WorkflowRule::new(
                "rule-2",
                2,
                vec![Condition::amount(
                    ComparisonOperator::GreaterThan,
                    EXECUTIVE_LIMIT,
                )],
                ApprovalAction::new(
                    ApproverRole::Cfo,
                    NotificationChannel::Slack,
                    "High value invoice requires CFO approval",
                ),
                "Amount > 10000 → CFO via Slack",
            ),
            WorkflowRule::new(
                "rule-3",
                3,
                vec![
                    Condition::amount(ComparisonOperator::GreaterThan, STANDARD_LIMIT),
                    Condition::amount(ComparisonOperator::LessThanOrEqual, EXECUTIVE_LIMIT),
                    Condition::manager_approval(true),
                ],
                ApprovalAction::new(
                    ApproverRole::FinanceManager,
                    NotificationChannel::Email,
                    "Invoice requires Finance Manager approval",
                ),
                "5000 < Amount <= 10000 AND Requires Manager Approval → Finance Manager via Email",
            ),
            WorkflowRule::new(
                "rule-4",
                4,
                vec![
                    Condition::amount(ComparisonOperator::GreaterThan, STANDARD_LIMIT),
                    Condition::amount(ComparisonOperator::LessThanOrEqual, EXECUTIVE_LIMIT),
                    Condition::manager_approval(false),
                ],
                ApprovalAction::new(
                    ApproverRole::FinanceTeam,
                    NotificationChannel::Slack,
                    "Invoice can be approved by any Finance Team member",
                ),
                "5000 < Amount <= 10000 AND No Manager Approval Required → Finance Team via Slack",
            ),
            WorkflowRule::new(
                "rule-5",
                5,
                vec![Condition::amount(
                    ComparisonOperator::LessThanOrEqual,
                    STANDARD_LIMIT,
                )],
                ApprovalAction::new(
                    ApproverRole::FinanceTeam,
                    NotificationChannel::Slack,
                    "Standard invoice approval by Finance Team",
                ),
                "Amount <= 5000 → Finance Team via Slack",
            ),
        ];

        Self::from_rules(rules)
    }

    /// Extension hook; only reachable before the catalog is shared.
    pub fn add_rule(&mut self, rule: WorkflowRule) {
        let index = self
            .rules
            .partition_point(|existing| existing.priority <= rule.priority);
        self.rules.insert(index, rule);
    }

    /// Rules in ascending priority; equal priorities keep insertion order.
    pub fn rules_by_priority(&self) -> &[WorkflowRule] {
        &self.rules
    }

    pub fn rule_by_id(&self, id: &str) -> Option<&WorkflowRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
