use crate::core::expense::Expense;
use crate::core::ledger::GroupLedger;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Budget bucket a piece of spending belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    Essential,
    Personal,
    Investment,
    Debt,
    Emergency,
}

impl BudgetKind {
    pub const ALL: [BudgetKind; 5] = [
        BudgetKind::Essential,
        BudgetKind::Personal,
        BudgetKind::Investment,
        BudgetKind::Debt,
        BudgetKind::Emergency,
    ];

    /// Which of the three 50/30/20 buckets this kind rolls up into.
    pub fn bucket(self) -> Bucket {
        match self {
            BudgetKind::Essential => Bucket::Needs,
            BudgetKind::Personal => Bucket::Wants,
            BudgetKind::Investment | BudgetKind::Debt | BudgetKind::Emergency => Bucket::Savings,
        }
    }
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BudgetKind::Essential => "essential",
            BudgetKind::Personal => "personal",
            BudgetKind::Investment => "investment",
            BudgetKind::Debt => "debt",
            BudgetKind::Emergency => "emergency",
        };
        write!(f, "{}", name)
    }
}

/// The three top-level buckets of a 50/30/20-style target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Needs,
    Wants,
    Savings,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bucket::Needs => "needs",
            Bucket::Wants => "wants",
            Bucket::Savings => "savings",
        };
        write!(f, "{}", name)
    }
}

const ESSENTIAL_KEYWORDS: &[&str] = &[
    "rent", "grocer", "utilit", "electric", "water", "gas", "internet", "insurance", "transit",
    "commute", "fuel", "childcare",
];
const PERSONAL_KEYWORDS: &[&str] = &[
    "dining", "restaurant", "travel", "vacation", "entertainment", "hobby", "streaming",
    "shopping", "gift", "coffee",
];
const INVESTMENT_KEYWORDS: &[&str] = &["invest", "stock", "etf", "retirement", "pension", "401k"];
const DEBT_KEYWORDS: &[&str] = &["loan", "mortgage", "credit card", "debt", "interest"];
const EMERGENCY_KEYWORDS: &[&str] = &["emergency", "medical", "hospital", "repair", "urgent"];

/// Classify a free-text label by keyword. Returns `None` when nothing
/// matches.
pub fn classify_label(label: &str) -> Option<BudgetKind> {
    let lower = label.to_lowercase();
    let tables = [
        (ESSENTIAL_KEYWORDS, BudgetKind::Essential),
        (PERSONAL_KEYWORDS, BudgetKind::Personal),
        (INVESTMENT_KEYWORDS, BudgetKind::Investment),
        (DEBT_KEYWORDS, BudgetKind::Debt),
        (EMERGENCY_KEYWORDS, BudgetKind::Emergency),
    ];
    for (keywords, kind) in tables {
        if keywords.iter().any(|k| lower.contains(k)) {
            return Some(kind);
        }
    }
    None
}

/// Classify an expense against its ledger.
///
/// Resolution order: an explicit override on the registered category wins;
/// then keywords in the category name; then keywords in the description;
/// unmatched spending lands in `Personal`.
pub fn classify_expense(ledger: &GroupLedger, expense: &Expense) -> BudgetKind {
    if let Some(category) = ledger.find_category(expense.category()) {
        if let Some(kind) = category.budget_kind() {
            return kind;
        }
    }
    classify_label(expense.category())
        .or_else(|| expense.description().and_then(classify_label))
        .unwrap_or(BudgetKind::Personal)
}

/// Percentage targets for the three buckets. Must sum to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSplit {
    pub needs: Decimal,
    pub wants: Decimal,
    pub savings: Decimal,
}

impl TargetSplit {
    /// Build a custom target.
    ///
    /// # Panics
    ///
    /// Panics if the percentages do not sum to 100.
    pub fn new(needs: Decimal, wants: Decimal, savings: Decimal) -> Self {
        assert!(
            needs + wants + savings == dec!(100),
            "Target percentages must sum to 100, got {}",
            needs + wants + savings
        );
        Self {
            needs,
            wants,
            savings,
        }
    }

    pub fn target_for(&self, bucket: Bucket) -> Decimal {
        match bucket {
            Bucket::Needs => self.needs,
            Bucket::Wants => self.wants,
            Bucket::Savings => self.savings,
        }
    }
}

impl Default for TargetSplit {
    /// The classic 50/30/20 rule.
    fn default() -> Self {
        Self::new(dec!(50), dec!(30), dec!(20))
    }
}

/// Spending broken down by budget kind and bucket, compared to a target.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetReport {
    /// Total spending per budget kind.
    pub by_kind: BTreeMap<BudgetKind, Decimal>,
    /// Total spending per 50/30/20 bucket.
    pub by_bucket: BTreeMap<Bucket, Decimal>,
    /// Total spending across all expenses.
    pub total_spent: Decimal,
    /// Total income recorded in the ledger.
    pub total_income: Decimal,
    /// The target this report compares against.
    pub target: TargetSplit,
}

impl BudgetReport {
    /// Aggregate a ledger's expenses into a budget report.
    pub fn build(ledger: &GroupLedger, target: TargetSplit) -> Self {
        let mut by_kind: BTreeMap<BudgetKind, Decimal> = BTreeMap::new();
        let mut by_bucket: BTreeMap<Bucket, Decimal> = BTreeMap::new();

        for expense in ledger.expenses().expenses() {
            let kind = classify_expense(ledger, expense);
            *by_kind.entry(kind).or_insert(Decimal::ZERO) += expense.amount();
            *by_bucket.entry(kind.bucket()).or_insert(Decimal::ZERO) += expense.amount();
        }

        Self {
            by_kind,
            by_bucket,
            total_spent: ledger.total_spent(),
            total_income: ledger.total_income(),
            target,
        }
    }

    pub fn spent_in(&self, kind: BudgetKind) -> Decimal {
        self.by_kind.get(&kind).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn bucket_total(&self, bucket: Bucket) -> Decimal {
        self.by_bucket.get(&bucket).copied().unwrap_or(Decimal::ZERO)
    }

    /// Actual share of total spending in a bucket, as a percentage.
    pub fn actual_percent(&self, bucket: Bucket) -> f64 {
        if self.total_spent == Decimal::ZERO {
            return 0.0;
        }
        let pct = self.bucket_total(bucket) * dec!(100) / self.total_spent;
        pct.to_string().parse::<f64>().unwrap_or(0.0)
    }

    /// Actual minus target share for a bucket; positive means overspent
    /// relative to the target.
    pub fn deviation_percent(&self, bucket: Bucket) -> f64 {
        let target: f64 = self
            .target
            .target_for(bucket)
            .to_string()
            .parse()
            .unwrap_or(0.0);
        self.actual_percent(bucket) - target
    }

    /// Spending as a share of income, when income was recorded.
    pub fn spend_to_income_percent(&self) -> Option<f64> {
        if self.total_income == Decimal::ZERO {
            return None;
        }
        let pct = self.total_spent * dec!(100) / self.total_income;
        pct.to_string().parse::<f64>().ok()
    }
}

impl fmt::Display for BudgetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Budget Report ===")?;
        writeln!(f, "Total Spent:   {}", self.total_spent)?;
        if self.total_income > Decimal::ZERO {
            writeln!(f, "Total Income:  {}", self.total_income)?;
            if let Some(pct) = self.spend_to_income_percent() {
                writeln!(f, "Spend/Income:  {:.1}%", pct)?;
            }
        }

        writeln!(f, "\nBy bucket (actual vs target):")?;
        for bucket in [Bucket::Needs, Bucket::Wants, Bucket::Savings] {
            writeln!(
                f,
                "  {:<8} {:>10}  {:>5.1}% (target {}%)",
                bucket.to_string(),
                self.bucket_total(bucket),
                self.actual_percent(bucket),
                self.target.target_for(bucket),
            )?;
        }

        writeln!(f, "\nBy kind:")?;
        for (kind, amount) in &self.by_kind {
            writeln!(f, "  {:<12} {}", kind.to_string(), amount)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::category::Category;
    use crate::core::group::Group;
    use crate::core::user::UserId;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn solo_ledger() -> GroupLedger {
        GroupLedger::new(Group::with_members("solo", [UserId::new("alice")]))
    }

    fn spend(ledger: &mut GroupLedger, amount: Decimal, category: &str) {
        ledger
            .record_expense(Expense::split_evenly(
                UserId::new("alice"),
                amount,
                category,
                date(),
                [UserId::new("alice")],
            ))
            .unwrap();
    }

    #[test]
    fn test_keyword_classification() {
        assert_eq!(classify_label("Groceries"), Some(BudgetKind::Essential));
        assert_eq!(classify_label("dining out"), Some(BudgetKind::Personal));
        assert_eq!(classify_label("index etf buy"), Some(BudgetKind::Investment));
        assert_eq!(classify_label("credit card payment"), Some(BudgetKind::Debt));
        assert_eq!(classify_label("ER visit medical"), Some(BudgetKind::Emergency));
        assert_eq!(classify_label("zzz"), None);
    }

    #[test]
    fn test_category_override_wins() {
        let mut ledger = solo_ledger();
        // "grocer" keyword would say Essential; the override pins it elsewhere.
        ledger.add_category(Category::new("groceries").with_budget_kind(BudgetKind::Personal));
        spend(&mut ledger, dec!(80), "groceries");

        let report = BudgetReport::build(&ledger, TargetSplit::default());
        assert_eq!(report.spent_in(BudgetKind::Personal), dec!(80));
        assert_eq!(report.spent_in(BudgetKind::Essential), Decimal::ZERO);
    }

    #[test]
    fn test_unmatched_defaults_to_personal() {
        let mut ledger = solo_ledger();
        spend(&mut ledger, dec!(10), "mystery");
        let report = BudgetReport::build(&ledger, TargetSplit::default());
        assert_eq!(report.spent_in(BudgetKind::Personal), dec!(10));
    }

    #[test]
    fn test_bucket_percentages() {
        let mut ledger = solo_ledger();
        spend(&mut ledger, dec!(500), "rent");
        spend(&mut ledger, dec!(300), "dining");
        spend(&mut ledger, dec!(200), "retirement fund");

        let report = BudgetReport::build(&ledger, TargetSplit::default());
        assert_eq!(report.bucket_total(Bucket::Needs), dec!(500));
        assert_eq!(report.bucket_total(Bucket::Wants), dec!(300));
        assert_eq!(report.bucket_total(Bucket::Savings), dec!(200));
        assert!((report.actual_percent(Bucket::Needs) - 50.0).abs() < 0.01);
        assert!(report.deviation_percent(Bucket::Needs).abs() < 0.01);
    }

    #[test]
    fn test_spend_to_income() {
        use crate::core::income::IncomeEntry;
        let mut ledger = solo_ledger();
        spend(&mut ledger, dec!(500), "rent");
        ledger
            .record_income(IncomeEntry::new(UserId::new("alice"), dec!(2000), date(), "salary"))
            .unwrap();

        let report = BudgetReport::build(&ledger, TargetSplit::default());
        let pct = report.spend_to_income_percent().unwrap();
        assert!((pct - 25.0).abs() < 0.01);
    }

    #[test]
    #[should_panic(expected = "must sum to 100")]
    fn test_bad_target_rejected() {
        TargetSplit::new(dec!(60), dec!(30), dec!(30));
    }
}
