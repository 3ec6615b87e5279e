use crate::analytics::budget::{classify_expense, BudgetKind};
use crate::core::ledger::GroupLedger;
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Calendar month key, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Aggregated activity for one calendar month.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthlySummary {
    /// Spending per category name.
    pub by_category: BTreeMap<String, Decimal>,
    /// Spending per budget kind.
    pub by_kind: BTreeMap<BudgetKind, Decimal>,
    /// Total spending in the month.
    pub spent: Decimal,
    /// Total income in the month.
    pub income: Decimal,
}

impl MonthlySummary {
    /// Income minus spending.
    pub fn net(&self) -> Decimal {
        self.income - self.spent
    }
}

/// Month-by-month breakdown of a group's activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthlyBreakdown {
    months: BTreeMap<Month, MonthlySummary>,
}

impl MonthlyBreakdown {
    /// Aggregate a ledger's expenses and income by calendar month.
    pub fn build(ledger: &GroupLedger) -> Self {
        let mut months: BTreeMap<Month, MonthlySummary> = BTreeMap::new();

        for expense in ledger.expenses().expenses() {
            let key = Month {
                year: expense.date().year(),
                month: expense.date().month(),
            };
            let kind = classify_expense(ledger, expense);
            let summary = months.entry(key).or_default();
            summary.spent += expense.amount();
            *summary
                .by_category
                .entry(expense.category().to_lowercase())
                .or_insert(Decimal::ZERO) += expense.amount();
            *summary.by_kind.entry(kind).or_insert(Decimal::ZERO) += expense.amount();
        }

        for entry in ledger.income() {
            let key = Month {
                year: entry.date().year(),
                month: entry.date().month(),
            };
            months.entry(key).or_default().income += entry.amount();
        }

        Self { months }
    }

    pub fn months(&self) -> &BTreeMap<Month, MonthlySummary> {
        &self.months
    }

    pub fn summary(&self, year: i32, month: u32) -> Option<&MonthlySummary> {
        self.months.get(&Month { year, month })
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

impl fmt::Display for MonthlyBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Monthly Breakdown ===")?;
        for (month, summary) in &self.months {
            writeln!(
                f,
                "{}  spent {:>10}  income {:>10}  net {:>10}",
                month,
                summary.spent,
                summary.income,
                summary.net()
            )?;
            for (category, amount) in &summary.by_category {
                writeln!(f, "    {:<14} {}", category, amount)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::Expense;
    use crate::core::group::Group;
    use crate::core::income::IncomeEntry;
    use crate::core::user::UserId;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_months_partition_activity() {
        let mut ledger = GroupLedger::new(Group::with_members("solo", [UserId::new("alice")]));
        for (amount, category, date) in [
            (dec!(100), "rent", d(2024, 1, 1)),
            (dec!(40), "dining", d(2024, 1, 20)),
            (dec!(100), "rent", d(2024, 2, 1)),
        ] {
            ledger
                .record_expense(Expense::split_evenly(
                    UserId::new("alice"),
                    amount,
                    category,
                    date,
                    [UserId::new("alice")],
                ))
                .unwrap();
        }
        ledger
            .record_income(IncomeEntry::new(
                UserId::new("alice"),
                dec!(2000),
                d(2024, 1, 31),
                "salary",
            ))
            .unwrap();

        let breakdown = MonthlyBreakdown::build(&ledger);
        assert_eq!(breakdown.months().len(), 2);

        let january = breakdown.summary(2024, 1).unwrap();
        assert_eq!(january.spent, dec!(140));
        assert_eq!(january.income, dec!(2000));
        assert_eq!(january.net(), dec!(1860));
        assert_eq!(january.by_category["rent"], dec!(100));
        assert_eq!(january.by_kind[&BudgetKind::Essential], dec!(100));
        assert_eq!(january.by_kind[&BudgetKind::Personal], dec!(40));

        let february = breakdown.summary(2024, 2).unwrap();
        assert_eq!(february.spent, dec!(100));
        assert_eq!(february.net(), dec!(-100));
    }

    #[test]
    fn test_empty_ledger_empty_breakdown() {
        let ledger = GroupLedger::new(Group::new("empty"));
        assert!(MonthlyBreakdown::build(&ledger).is_empty());
    }
}
