use crate::core::balance::BalanceSheet;
use crate::core::category::Category;
use crate::core::expense::{Expense, ExpenseLog};
use crate::core::group::Group;
use crate::core::income::IncomeEntry;
use crate::core::settlement::Settlement;
use crate::core::user::UserId;
use crate::graph::debt_graph::DebtGraph;
use crate::schedule::recurring::RecurringRule;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors arising from recording activity against a group ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{user} is not a member of group '{group}'")]
    NotAMember { user: UserId, group: String },
    #[error("expense shares do not sum to the amount (off by more than 0.01)")]
    SharesDoNotSum,
    #[error("income allocations exceed the income amount")]
    OverAllocated,
}

/// The in-memory book for one group: members, categories, expenses,
/// settlements, income, and recurring payment rules.
///
/// All mutators validate membership and amount invariants before
/// accepting a record; queries derive balances and pairwise debts from
/// the accepted records.
///
/// # Examples
///
/// ```
/// use splitledger::core::group::Group;
/// use splitledger::core::expense::Expense;
/// use splitledger::core::ledger::GroupLedger;
/// use splitledger::core::user::UserId;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let group = Group::with_members("flat", [UserId::new("alice"), UserId::new("bob")]);
/// let mut ledger = GroupLedger::new(group);
///
/// let rent = Expense::split_evenly(
///     UserId::new("alice"),
///     dec!(1200),
///     "rent",
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     [UserId::new("alice"), UserId::new("bob")],
/// );
/// ledger.record_expense(rent).unwrap();
///
/// let balances = ledger.balances();
/// assert_eq!(balances.position(&UserId::new("bob")), dec!(-600));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupLedger {
    group: Group,
    categories: Vec<Category>,
    expenses: ExpenseLog,
    settlements: Vec<Settlement>,
    income: Vec<IncomeEntry>,
    recurring: Vec<RecurringRule>,
}

impl GroupLedger {
    pub fn new(group: Group) -> Self {
        Self {
            group,
            categories: Vec::new(),
            expenses: ExpenseLog::new(),
            settlements: Vec::new(),
            income: Vec::new(),
            recurring: Vec::new(),
        }
    }

    // --- Mutators ---

    /// Register a category. Duplicate names (case-insensitive) are dropped.
    pub fn add_category(&mut self, category: Category) {
        if !self.categories.iter().any(|c| c.matches(category.name())) {
            self.categories.push(category);
        }
    }

    /// Record an expense after validating membership and share sums.
    pub fn record_expense(&mut self, expense: Expense) -> Result<(), LedgerError> {
        self.require_member(expense.payer())?;
        for user in expense.participants() {
            self.require_member(user)?;
        }
        if !expense.shares_are_valid() {
            return Err(LedgerError::SharesDoNotSum);
        }
        self.expenses.add(expense);
        Ok(())
    }

    /// Record a direct payment between two members.
    pub fn record_settlement(&mut self, settlement: Settlement) -> Result<(), LedgerError> {
        self.require_member(settlement.from())?;
        self.require_member(settlement.to())?;
        self.settlements.push(settlement);
        Ok(())
    }

    /// Record income for a member.
    pub fn record_income(&mut self, entry: IncomeEntry) -> Result<(), LedgerError> {
        self.require_member(entry.recipient())?;
        if !entry.allocations_are_valid() {
            return Err(LedgerError::OverAllocated);
        }
        self.income.push(entry);
        Ok(())
    }

    /// Register a recurring payment rule.
    pub fn add_rule(&mut self, rule: RecurringRule) -> Result<(), LedgerError> {
        self.require_member(rule.payer())?;
        for user in rule.participants() {
            self.require_member(user)?;
        }
        self.recurring.push(rule);
        Ok(())
    }

    fn require_member(&self, user: &UserId) -> Result<(), LedgerError> {
        if self.group.is_member(user) {
            Ok(())
        } else {
            Err(LedgerError::NotAMember {
                user: user.clone(),
                group: self.group.name().to_string(),
            })
        }
    }

    // --- Queries ---

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a registered category by name (case-insensitive).
    pub fn find_category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.matches(name))
    }

    pub fn expenses(&self) -> &ExpenseLog {
        &self.expenses
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn income(&self) -> &[IncomeEntry] {
        &self.income
    }

    pub fn recurring(&self) -> &[RecurringRule] {
        &self.recurring
    }

    pub fn recurring_mut(&mut self) -> &mut [RecurringRule] {
        &mut self.recurring
    }

    /// Total gross spending recorded.
    pub fn total_spent(&self) -> Decimal {
        self.expenses.total_spent()
    }

    /// Total income recorded.
    pub fn total_income(&self) -> Decimal {
        self.income.iter().map(|i| i.amount()).sum()
    }

    /// Compute every member's net position from the recorded expenses and
    /// settlements.
    pub fn balances(&self) -> BalanceSheet {
        let mut sheet = BalanceSheet::new();
        for expense in self.expenses.expenses() {
            sheet.apply_expense(expense);
        }
        for settlement in &self.settlements {
            sheet.apply_settlement(settlement);
        }
        sheet
    }

    /// Build the pairwise who-owes-whom graph from the recorded activity.
    pub fn debt_graph(&self) -> DebtGraph {
        let mut graph = DebtGraph::new();
        for expense in self.expenses.expenses() {
            graph.add_expense(expense);
        }
        for settlement in &self.settlements {
            graph.add_settlement(settlement);
        }
        graph
    }
}
