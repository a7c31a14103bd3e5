use std::fmt;

use super::domain::Invoice;

/// Tolerance used by `==` and `!=` on invoice amounts.
pub const AMOUNT_EPSILON: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
}

impl ComparisonOperator {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        }
    }

    pub fn compare(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::GreaterThan => value > threshold,
            Self::GreaterThanOrEqual => value >= threshold,
            Self::LessThan => value < threshold,
            Self::LessThanOrEqual => value <= threshold,
            Self::Equal => (value - threshold).abs() < AMOUNT_EPSILON,
            Self::NotEqual => (value - threshold).abs() >= AMOUNT_EPSILON,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Predicate over a single invoice attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Amount {
        operator: ComparisonOperator,
        threshold: f64,
    },
    /// Case-insensitive match on the department name.
    Department { expected: String },
    ManagerApproval { expected: bool },
}

impl Condition {
    pub fn amount(operator: ComparisonOperator, threshold: f64) -> Self {
        Self::Amount {
            operator,
            threshold,
        }
    }

    pub fn department(expected: impl Into<String>) -> Self {
        Self::Department {
            expected: expected.into(),
        }
    }

    pub fn manager_approval(expected: bool) -> Self {
        Self::ManagerApproval { expected }
    }

    pub fn evaluate(&self, invoice: &Invoice) -> bool {
        match self {
            Self::Amount {
                operator,
                threshold,
            } => operator.compare(invoice.amount, *threshold),
            Self::Department { expected } => {
                invoice.department.to_lowercase() == expected.to_lowercase()
            }
            Self::ManagerApproval { expected } => invoice.requires_manager_approval == *expected,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Amount {
                operator,
                threshold,
            } => format!("Amount {} {:.2}", operator, threshold),
            Self::Department { expected } => format!("Department == '{expected}'"),
            Self::ManagerApproval { expected } => {
                format!("Requires Manager Approval == {expected}")
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(amount: f64) -> Invoice {
        Invoice::new(amount, "Marketing", true)
    }

    #[test]
    fn ordering_operators_are_strict_where_expected() {
        assert!(!ComparisonOperator::GreaterThan.compare(10_000.0, 10_000.0));
        assert!(ComparisonOperator::GreaterThanOrEqual.compare(10_000.0, 10_000.0));
        assert!(!ComparisonOperator::LessThan.compare(5_000.0, 5_000.0));
        assert!(ComparisonOperator::LessThanOrEqual.compare(5_000.0, 5_000.0));
    }

    #[test]
    fn equality_tolerates_float_noise() {
        assert!(ComparisonOperator::Equal.compare(0.1 + 0.2, 0.3));
        assert!(ComparisonOperator::Equal.compare(100.0005, 100.0));
        assert!(!ComparisonOperator::Equal.compare(100.002, 100.0));
        assert!(!ComparisonOperator::NotEqual.compare(100.0005, 100.0));
        assert!(ComparisonOperator::NotEqual.compare(100.01, 100.0));
    }

    #[test]
    fn department_match_ignores_case() {
        let condition = Condition::department("marketing");
        assert!(condition.evaluate(&invoice(1.0)));
        assert!(condition.evaluate(&Invoice::new(1.0, "MARKETING", false)));
        assert!(!condition.evaluate(&Invoice::new(1.0, "marketing ops", false)));
    }

    #[test]
    fn manager_flag_must_match_exactly() {
        assert!(Condition::manager_approval(true).evaluate(&invoice(1.0)));
        assert!(!Condition::manager_approval(false).evaluate(&invoice(1.0)));
    }

    #[test]
    fn descriptions_are_human_readable() {
        assert_eq!(
            Condition::amount(ComparisonOperator::GreaterThan, 10_000.0).description(),
            "Amount > 10000.00"
        );
        assert_eq!(
            Condition::department("marketing").description(),
            "Department == 'marketing'"
        );
        assert_eq!(
            Condition::manager_approval(false).to_string(),
            "Requires Manager Approval == false"
        );
    }
}
