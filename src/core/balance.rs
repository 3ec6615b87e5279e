use crate::core::expense::{epsilon, Expense};
use crate::core::settlement::Settlement;
use crate::core::user::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net signed position per member within a group.
///
/// A positive balance means the member is owed (net creditor).
/// A negative balance means the member owes (net debtor).
///
/// The sheet is the output of applying every expense and settlement in a
/// group — it is what each member actually needs to pay or receive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// UserId -> net balance. Positive = is owed, negative = owes.
    positions: BTreeMap<UserId, Decimal>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet directly from raw balances (for tests and the planner).
    pub fn from_positions(positions: impl IntoIterator<Item = (UserId, Decimal)>) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    /// Apply an expense: the payer fronted the money, every participant
    /// owes their share (the payer's own share cancels part of the front).
    pub fn apply_expense(&mut self, expense: &Expense) {
        *self
            .positions
            .entry(expense.payer().clone())
            .or_insert(Decimal::ZERO) += expense.amount();
        for (user, share) in expense.shares() {
            *self.positions.entry(user.clone()).or_insert(Decimal::ZERO) -= *share;
        }
    }

    /// Apply a settlement: the payer's position rises, the receiver's falls.
    pub fn apply_settlement(&mut self, settlement: &Settlement) {
        *self
            .positions
            .entry(settlement.from().clone())
            .or_insert(Decimal::ZERO) += settlement.amount();
        *self
            .positions
            .entry(settlement.to().clone())
            .or_insert(Decimal::ZERO) -= settlement.amount();
    }

    /// Net position of a member (zero if unknown).
    pub fn position(&self, user: &UserId) -> Decimal {
        self.positions.get(user).copied().unwrap_or(Decimal::ZERO)
    }

    /// All positions, including zeros.
    pub fn all_positions(&self) -> &BTreeMap<UserId, Decimal> {
        &self.positions
    }

    /// Members who are owed more than a cent, largest first.
    pub fn creditors(&self) -> Vec<(UserId, Decimal)> {
        let mut c: Vec<(UserId, Decimal)> = self
            .positions
            .iter()
            .filter(|(_, b)| **b > epsilon())
            .map(|(u, b)| (u.clone(), *b))
            .collect();
        c.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        c
    }

    /// Members who owe more than a cent, deepest in debt first.
    pub fn debtors(&self) -> Vec<(UserId, Decimal)> {
        let mut d: Vec<(UserId, Decimal)> = self
            .positions
            .iter()
            .filter(|(_, b)| **b < -epsilon())
            .map(|(u, b)| (u.clone(), *b))
            .collect();
        d.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        d
    }

    /// Verify the sheet is conserved: all positions sum to zero.
    pub fn is_balanced(&self) -> bool {
        self.positions.values().sum::<Decimal>() == Decimal::ZERO
    }

    /// True when every position is within a cent of zero — nobody owes
    /// anybody anything worth transferring.
    pub fn is_settled(&self) -> bool {
        self.positions.values().all(|b| b.abs() <= epsilon())
    }

    /// Total amount owed to creditors (= total owed by debtors when the
    /// sheet is balanced).
    pub fn total_outstanding(&self) -> Decimal {
        self.positions
            .values()
            .filter(|b| **b > Decimal::ZERO)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_expense_moves_positions() {
        let mut sheet = BalanceSheet::new();
        let dinner = Expense::split_evenly(
            UserId::new("alice"),
            dec!(90),
            "dining",
            date(),
            [UserId::new("alice"), UserId::new("bob"), UserId::new("carol")],
        );
        sheet.apply_expense(&dinner);

        // Alice fronted 90, owes her own 30 -> +60.
        assert_eq!(sheet.position(&UserId::new("alice")), dec!(60));
        assert_eq!(sheet.position(&UserId::new("bob")), dec!(-30));
        assert_eq!(sheet.position(&UserId::new("carol")), dec!(-30));
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_settlement_offsets_debt() {
        let mut sheet = BalanceSheet::new();
        let dinner = Expense::split_evenly(
            UserId::new("alice"),
            dec!(60),
            "dining",
            date(),
            [UserId::new("alice"), UserId::new("bob")],
        );
        sheet.apply_expense(&dinner);
        assert_eq!(sheet.position(&UserId::new("bob")), dec!(-30));

        let payment = Settlement::new(UserId::new("bob"), UserId::new("alice"), dec!(30), date());
        sheet.apply_settlement(&payment);
        assert_eq!(sheet.position(&UserId::new("bob")), Decimal::ZERO);
        assert!(sheet.is_settled());
    }

    #[test]
    fn test_creditors_and_debtors_ordering() {
        let sheet = BalanceSheet::from_positions([
            (UserId::new("a"), dec!(100)),
            (UserId::new("b"), dec!(-60)),
            (UserId::new("c"), dec!(-40)),
        ]);
        let creditors = sheet.creditors();
        let debtors = sheet.debtors();
        assert_eq!(creditors[0].0.as_str(), "a");
        assert_eq!(debtors[0].0.as_str(), "b"); // deepest debt first
        assert_eq!(sheet.total_outstanding(), dec!(100));
    }

    #[test]
    fn test_dust_is_settled() {
        let sheet = BalanceSheet::from_positions([
            (UserId::new("a"), dec!(0.01)),
            (UserId::new("b"), dec!(-0.01)),
        ]);
        assert!(sheet.is_settled());
        assert!(sheet.creditors().is_empty());
        assert!(sheet.debtors().is_empty());
    }
}
