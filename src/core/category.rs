use crate::analytics::budget::BudgetKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An expense category within a group.
///
/// Categories are matched case-insensitively by name. A category may carry
/// an explicit budget-kind override; otherwise the keyword classifier in
/// [`crate::analytics::budget`] decides which bucket it falls into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    budget_kind: Option<BudgetKind>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            budget_kind: None,
        }
    }

    /// Pin this category to a specific budget bucket, bypassing keyword
    /// classification.
    pub fn with_budget_kind(mut self, kind: BudgetKind) -> Self {
        self.budget_kind = Some(kind);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn budget_kind(&self) -> Option<BudgetKind> {
        self.budget_kind
    }

    /// Case-insensitive name match.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_match_case_insensitive() {
        let c = Category::new("Groceries");
        assert!(c.matches("groceries"));
        assert!(c.matches("GROCERIES"));
        assert!(!c.matches("rent"));
    }

    #[test]
    fn test_category_override() {
        let c = Category::new("side-hustle-gear").with_budget_kind(BudgetKind::Investment);
        assert_eq!(c.budget_kind(), Some(BudgetKind::Investment));
    }
}
