use crate::core::user::UserId;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Tolerance for monetary comparisons: one cent.
pub fn epsilon() -> Decimal {
    dec!(0.01)
}

/// A shared expense paid by one member and split among participants.
///
/// The `payer` fronted the full `amount`; each entry in `shares` records how
/// much of it a participant is responsible for. The payer may (and usually
/// does) appear in `shares` with their own portion.
///
/// Expenses are immutable once created. The balance engine operates on
/// collections of expenses and settlements to compute net positions.
///
/// # Examples
///
/// ```
/// use splitledger::core::expense::Expense;
/// use splitledger::core::user::UserId;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::split_evenly(
///     UserId::new("alice"),
///     dec!(90),
///     "dining",
///     NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
///     [UserId::new("alice"), UserId::new("bob"), UserId::new("carol")],
/// );
///
/// assert_eq!(dinner.amount(), dec!(90));
/// assert_eq!(dinner.share_of(&UserId::new("bob")), dec!(30));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier for this expense.
    id: Uuid,
    /// The member who paid the full amount up front.
    payer: UserId,
    /// The total amount paid. Must be positive.
    amount: Decimal,
    /// Category name (matched case-insensitively by analytics).
    category: String,
    /// Optional free-text description.
    description: Option<String>,
    /// The date the expense was incurred.
    date: NaiveDate,
    /// Participant shares. Must sum to `amount` within one cent.
    shares: BTreeMap<UserId, Decimal>,
}

impl Expense {
    /// Create a new expense with explicit per-participant shares.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive or `shares` is empty.
    pub fn new(
        payer: UserId,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
        shares: BTreeMap<UserId, Decimal>,
    ) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Expense amount must be positive, got {}",
            amount
        );
        assert!(!shares.is_empty(), "Expense must have at least one participant");
        Self {
            id: Uuid::new_v4(),
            payer,
            amount,
            category: category.into(),
            description: None,
            date,
            shares,
        }
    }

    /// Create an expense split evenly among `participants`.
    ///
    /// Leftover cents after division go one cent each to the first
    /// participants in id order, so shares always sum exactly to `amount`.
    pub fn split_evenly(
        payer: UserId,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
        participants: impl IntoIterator<Item = UserId>,
    ) -> Self {
        let shares = even_shares(amount, participants);
        Self::new(payer, amount, category, date, shares)
    }

    /// Create an expense with a specific ID (useful for testing / determinism).
    pub fn with_id(
        id: Uuid,
        payer: UserId,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
        shares: BTreeMap<UserId, Decimal>,
    ) -> Self {
        let mut expense = Self::new(payer, amount, category, date, shares);
        expense.id = id;
        expense
    }

    /// Set a free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn payer(&self) -> &UserId {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn shares(&self) -> &BTreeMap<UserId, Decimal> {
        &self.shares
    }

    /// The share owed by a specific participant (zero if not a participant).
    pub fn share_of(&self, user: &UserId) -> Decimal {
        self.shares.get(user).copied().unwrap_or(Decimal::ZERO)
    }

    /// All participants of this expense.
    pub fn participants(&self) -> impl Iterator<Item = &UserId> {
        self.shares.keys()
    }

    /// True when the shares are non-negative and sum to `amount` within
    /// one cent.
    pub fn shares_are_valid(&self) -> bool {
        if self.shares.values().any(|s| *s < Decimal::ZERO) {
            return false;
        }
        let total: Decimal = self.shares.values().sum();
        (total - self.amount).abs() <= epsilon()
    }
}

/// Divide `amount` evenly among participants, assigning remainder cents to
/// the first participants in id order.
fn even_shares(
    amount: Decimal,
    participants: impl IntoIterator<Item = UserId>,
) -> BTreeMap<UserId, Decimal> {
    let users: Vec<UserId> = {
        let mut u: Vec<UserId> = participants.into_iter().collect();
        u.sort();
        u.dedup();
        u
    };
    assert!(!users.is_empty(), "Even split requires at least one participant");

    let count = Decimal::from(users.len());
    let base = (amount / count).round_dp_with_strategy(2, RoundingStrategy::ToZero);

    let mut shares: BTreeMap<UserId, Decimal> =
        users.iter().cloned().map(|u| (u, base)).collect();

    let mut leftover = amount - base * count;
    let cent = epsilon();
    for user in &users {
        if leftover < cent {
            break;
        }
        *shares.get_mut(user).unwrap() += cent;
        leftover -= cent;
    }
    // Sub-cent dust (amounts with more than two decimal places) lands on
    // the first participant so the sum stays exact.
    if leftover > Decimal::ZERO {
        *shares.get_mut(&users[0]).unwrap() += leftover;
    }
    shares
}

/// A collection of expenses recorded against a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseLog {
    expenses: Vec<Expense>,
}

impl ExpenseLog {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
        }
    }

    pub fn add(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Total gross spending across all expenses.
    pub fn total_spent(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount()).sum()
    }

    /// All unique members appearing as payer or participant.
    pub fn participants(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .expenses
            .iter()
            .flat_map(|e| {
                std::iter::once(e.payer().clone()).chain(e.participants().cloned())
            })
            .collect();
        users.sort();
        users.dedup();
        users
    }
}

impl FromIterator<Expense> for ExpenseLog {
    fn from_iter<T: IntoIterator<Item = Expense>>(iter: T) -> Self {
        Self {
            expenses: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_even_split_exact() {
        let e = Expense::split_evenly(
            UserId::new("alice"),
            dec!(90),
            "dining",
            date(),
            [UserId::new("alice"), UserId::new("bob"), UserId::new("carol")],
        );
        assert_eq!(e.share_of(&UserId::new("alice")), dec!(30));
        assert_eq!(e.share_of(&UserId::new("bob")), dec!(30));
        assert_eq!(e.share_of(&UserId::new("carol")), dec!(30));
        assert!(e.shares_are_valid());
    }

    #[test]
    fn test_even_split_remainder_pennies() {
        let e = Expense::split_evenly(
            UserId::new("alice"),
            dec!(100),
            "groceries",
            date(),
            [UserId::new("alice"), UserId::new("bob"), UserId::new("carol")],
        );
        // 100 / 3 = 33.33 with 0.01 left over; first id gets the extra cent.
        assert_eq!(e.share_of(&UserId::new("alice")), dec!(33.34));
        assert_eq!(e.share_of(&UserId::new("bob")), dec!(33.33));
        assert_eq!(e.share_of(&UserId::new("carol")), dec!(33.33));
        let total: Decimal = e.shares().values().sum();
        assert_eq!(total, dec!(100));
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_zero_amount_rejected() {
        Expense::split_evenly(
            UserId::new("alice"),
            Decimal::ZERO,
            "misc",
            date(),
            [UserId::new("alice")],
        );
    }

    #[test]
    fn test_invalid_shares_detected() {
        let mut shares = BTreeMap::new();
        shares.insert(UserId::new("alice"), dec!(10));
        shares.insert(UserId::new("bob"), dec!(10));
        let e = Expense::new(UserId::new("alice"), dec!(50), "misc", date(), shares);
        assert!(!e.shares_are_valid());
    }

    #[test]
    fn test_log_totals_and_participants() {
        let mut log = ExpenseLog::new();
        log.add(Expense::split_evenly(
            UserId::new("alice"),
            dec!(40),
            "groceries",
            date(),
            [UserId::new("alice"), UserId::new("bob")],
        ));
        log.add(Expense::split_evenly(
            UserId::new("bob"),
            dec!(60),
            "utilities",
            date(),
            [UserId::new("bob"), UserId::new("carol")],
        ));
        assert_eq!(log.total_spent(), dec!(100));
        assert_eq!(log.participants().len(), 3);
    }
}
