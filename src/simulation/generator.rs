//! Generates random group activity to exercise the balance and planning
//! code under load.

use crate::core::expense::Expense;
use crate::core::group::Group;
use crate::core::ledger::GroupLedger;
use crate::core::settlement::Settlement;
use crate::core::user::UserId;
use chrono::{Days, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random group ledger.
#[derive(Debug, Clone)]
pub struct ActivityConfig {
    /// Number of members in the group.
    pub member_count: usize,
    /// Number of expenses to generate.
    pub expense_count: usize,
    /// Minimum expense amount.
    pub min_amount: Decimal,
    /// Maximum expense amount.
    pub max_amount: Decimal,
    /// Fraction of expenses followed by a partial settlement (0.0 to 1.0).
    pub settlement_ratio: f64,
    /// First activity date; expenses spread forward day by day.
    pub start_date: NaiveDate,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            member_count: 5,
            expense_count: 30,
            min_amount: Decimal::from(5),
            max_amount: Decimal::from(500),
            settlement_ratio: 0.1,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }
}

const CATEGORIES: &[&str] = &[
    "rent", "groceries", "utilities", "dining", "travel", "entertainment", "fuel", "repair",
];

/// Generate a random group ledger for testing.
///
/// Each expense picks a random payer and a random subset of participants
/// (always including the payer) and splits evenly. A configurable fraction
/// of expenses is followed by a partial settlement from a random debtor.
pub fn generate_activity(config: &ActivityConfig) -> GroupLedger {
    let mut rng = rand::thread_rng();

    let members: Vec<UserId> = (0..config.member_count)
        .map(|i| UserId::new(format!("member-{:03}", i)))
        .collect();
    let mut ledger = GroupLedger::new(Group::with_members("generated", members.clone()));

    let min_f64: f64 = config.min_amount.to_string().parse().unwrap_or(5.0);
    let max_f64: f64 = config.max_amount.to_string().parse().unwrap_or(500.0);

    for i in 0..config.expense_count {
        let payer = members[rng.gen_range(0..members.len())].clone();

        let mut participants: Vec<UserId> = members
            .iter()
            .filter(|_| rng.gen_bool(0.6))
            .cloned()
            .collect();
        if !participants.contains(&payer) {
            participants.push(payer.clone());
        }

        let amount_f64 = rng.gen_range(min_f64..max_f64);
        let amount = Decimal::from_f64_retain(amount_f64)
            .unwrap_or(Decimal::from(10))
            .round_dp(2);
        if amount <= Decimal::ZERO {
            continue;
        }

        let date = config.start_date + Days::new((i % 120) as u64);
        let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];

        let expense = Expense::split_evenly(payer, amount, category, date, participants);
        ledger
            .record_expense(expense)
            .expect("generated members are always in the group");

        if rng.gen_bool(config.settlement_ratio) {
            let balances = ledger.balances();
            let debtors = balances.debtors();
            if let Some((debtor, balance)) = debtors.first() {
                let creditors = balances.creditors();
                if let Some((creditor, _)) = creditors.first() {
                    let owed = balance.abs();
                    let payment = (owed / Decimal::from(2)).round_dp(2);
                    if payment > Decimal::ZERO {
                        ledger
                            .record_settlement(Settlement::new(
                                debtor.clone(),
                                creditor.clone(),
                                payment,
                                date,
                            ))
                            .expect("generated members are always in the group");
                    }
                }
            }
        }
    }

    ledger
}
