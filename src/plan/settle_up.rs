use crate::core::balance::BalanceSheet;
use crate::core::expense::epsilon;
use crate::core::user::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single suggested payment within a settlement plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedPayment {
    /// The member who should pay.
    pub from: UserId,
    /// The member who should receive.
    pub to: UserId,
    /// The amount to transfer.
    pub amount: Decimal,
}

impl std::fmt::Display for SuggestedPayment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} pays {} {}", self.from, self.to, self.amount)
    }
}

/// A minimal-transfer plan that settles every balance on a sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    payments: Vec<SuggestedPayment>,
    /// Total outstanding on the input sheet (sum of positive balances).
    outstanding: Decimal,
}

impl SettlementPlan {
    /// The suggested payments, in the order the greedy matcher produced them.
    pub fn payments(&self) -> &[SuggestedPayment] {
        &self.payments
    }

    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Total amount moved by the plan.
    pub fn total_transferred(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// The outstanding amount the plan was built against.
    pub fn outstanding(&self) -> Decimal {
        self.outstanding
    }

    /// Total a given member pays under the plan.
    pub fn outflow(&self, user: &UserId) -> Decimal {
        self.payments
            .iter()
            .filter(|p| &p.from == user)
            .map(|p| p.amount)
            .sum()
    }

    /// Total a given member receives under the plan.
    pub fn inflow(&self, user: &UserId) -> Decimal {
        self.payments
            .iter()
            .filter(|p| &p.to == user)
            .map(|p| p.amount)
            .sum()
    }

    /// Verify the plan settles the sheet: applying every payment leaves all
    /// residual balances within a cent of zero.
    pub fn settles(&self, sheet: &BalanceSheet) -> bool {
        let mut residual: BTreeMap<UserId, Decimal> = sheet.all_positions().clone();
        for payment in &self.payments {
            *residual.entry(payment.from.clone()).or_insert(Decimal::ZERO) += payment.amount;
            *residual.entry(payment.to.clone()).or_insert(Decimal::ZERO) -= payment.amount;
        }
        residual.values().all(|b| b.abs() <= epsilon())
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Suggested Settlements ===")?;
        writeln!(f, "Outstanding:  {}", self.outstanding)?;
        writeln!(f, "Payments:     {}", self.payment_count())?;
        for payment in &self.payments {
            writeln!(f, "  {}", payment)?;
        }
        Ok(())
    }
}

/// The settlement suggestion engine.
///
/// Produces a minimal-transaction plan from a balance sheet via greedy
/// creditor/debtor matching.
pub struct SettlePlanner;

/// A working entry in the greedy matcher: current residual plus the
/// original magnitude for tie-breaking.
#[derive(Debug, Clone)]
struct Position {
    user: UserId,
    residual: Decimal,
    original: Decimal,
}

impl SettlePlanner {
    /// Derive a suggested settlement plan from net balances.
    ///
    /// # Algorithm
    ///
    /// 1. Split members into creditors (balance > 0.01) and debtors
    ///    (balance < −0.01); sub-cent dust is ignored.
    /// 2. Repeatedly pick the largest creditor and the deepest debtor and
    ///    transfer `min(credit, |debt|)` between them.
    /// 3. Drop whichever side reached zero (both, when they matched
    ///    exactly) and repeat until all residuals are within a cent.
    ///
    /// Ties are broken by original balance magnitude, then by user id, so
    /// the plan is fully deterministic. For `n` members with non-zero
    /// balance the plan has at most `n − 1` payments: every round retires
    /// at least one side.
    pub fn suggest(sheet: &BalanceSheet) -> SettlementPlan {
        let mut creditors: Vec<Position> = sheet
            .creditors()
            .into_iter()
            .map(|(user, balance)| Position {
                user,
                residual: balance,
                original: balance,
            })
            .collect();
        let mut debtors: Vec<Position> = sheet
            .debtors()
            .into_iter()
            .map(|(user, balance)| Position {
                user,
                residual: -balance,
                original: -balance,
            })
            .collect();

        let outstanding = sheet.total_outstanding();
        let mut payments = Vec::new();
        let eps = epsilon();

        while !creditors.is_empty() && !debtors.is_empty() {
            let ci = top_index(&creditors);
            let di = top_index(&debtors);

            let transfer = creditors[ci].residual.min(debtors[di].residual);
            payments.push(SuggestedPayment {
                from: debtors[di].user.clone(),
                to: creditors[ci].user.clone(),
                amount: transfer,
            });

            creditors[ci].residual -= transfer;
            debtors[di].residual -= transfer;

            if creditors[ci].residual <= eps {
                creditors.swap_remove(ci);
            }
            if debtors[di].residual <= eps {
                debtors.swap_remove(di);
            }
        }

        SettlementPlan {
            payments,
            outstanding,
        }
    }
}

/// Index of the position with the largest residual, breaking ties by
/// larger original magnitude, then ascending user id.
fn top_index(positions: &[Position]) -> usize {
    let mut best = 0;
    for i in 1..positions.len() {
        let candidate = &positions[i];
        let current = &positions[best];
        let ordering = candidate
            .residual
            .cmp(&current.residual)
            .then_with(|| candidate.original.cmp(&current.original))
            .then_with(|| current.user.cmp(&candidate.user));
        if ordering == std::cmp::Ordering::Greater {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sheet(positions: &[(&str, Decimal)]) -> BalanceSheet {
        BalanceSheet::from_positions(
            positions
                .iter()
                .map(|(u, b)| (UserId::new(*u), *b))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_one_creditor_two_debtors() {
        // Worked example: {A: +100, B: -60, C: -40}.
        let sheet = sheet(&[
            ("a", dec!(100)),
            ("b", dec!(-60)),
            ("c", dec!(-40)),
        ]);
        let plan = SettlePlanner::suggest(&sheet);

        assert_eq!(plan.payment_count(), 2);
        assert_eq!(plan.total_transferred(), dec!(100));
        assert_eq!(plan.inflow(&UserId::new("a")), dec!(100));
        assert_eq!(plan.outflow(&UserId::new("b")), dec!(60));
        assert_eq!(plan.outflow(&UserId::new("c")), dec!(40));
        assert!(plan.settles(&sheet));

        // Deepest debtor is matched first.
        assert_eq!(plan.payments()[0].from.as_str(), "b");
        assert_eq!(plan.payments()[0].amount, dec!(60));
    }

    #[test]
    fn test_two_creditors_one_debtor() {
        // Worked example: {A: +50, B: +50, C: -100}.
        let sheet = sheet(&[
            ("a", dec!(50)),
            ("b", dec!(50)),
            ("c", dec!(-100)),
        ]);
        let plan = SettlePlanner::suggest(&sheet);

        assert_eq!(plan.payment_count(), 2);
        assert_eq!(plan.outflow(&UserId::new("c")), dec!(100));
        assert_eq!(plan.inflow(&UserId::new("a")), dec!(50));
        assert_eq!(plan.inflow(&UserId::new("b")), dec!(50));
        assert!(plan.settles(&sheet));
    }

    #[test]
    fn test_exact_pair_single_payment() {
        let sheet = sheet(&[("a", dec!(25)), ("b", dec!(-25))]);
        let plan = SettlePlanner::suggest(&sheet);
        assert_eq!(plan.payment_count(), 1);
        assert_eq!(
            plan.payments()[0],
            SuggestedPayment {
                from: UserId::new("b"),
                to: UserId::new("a"),
                amount: dec!(25),
            }
        );
    }

    #[test]
    fn test_empty_and_settled_sheets() {
        let plan = SettlePlanner::suggest(&BalanceSheet::new());
        assert!(plan.is_empty());

        let dusty = sheet(&[("a", dec!(0.01)), ("b", dec!(-0.01))]);
        let plan = SettlePlanner::suggest(&dusty);
        assert!(plan.is_empty());
        assert!(plan.settles(&dusty));
    }

    #[test]
    fn test_at_most_n_minus_one_payments() {
        let sheet = sheet(&[
            ("a", dec!(70)),
            ("b", dec!(30)),
            ("c", dec!(-20)),
            ("d", dec!(-35)),
            ("e", dec!(-45)),
        ]);
        let plan = SettlePlanner::suggest(&sheet);
        assert!(plan.payment_count() <= 4);
        assert!(plan.settles(&sheet));
    }

    #[test]
    fn test_deterministic_on_ties() {
        let sheet = sheet(&[
            ("a", dec!(50)),
            ("b", dec!(50)),
            ("c", dec!(-50)),
            ("d", dec!(-50)),
        ]);
        let first = SettlePlanner::suggest(&sheet);
        let second = SettlePlanner::suggest(&sheet);
        assert_eq!(first.payments(), second.payments());
        // Equal residuals and originals: ascending user id wins.
        assert_eq!(first.payments()[0].to.as_str(), "a");
        assert_eq!(first.payments()[0].from.as_str(), "c");
    }

    #[test]
    fn test_sub_cent_residual_tolerated() {
        // Shares that do not divide evenly can leave sub-cent residue.
        let sheet = sheet(&[
            ("a", dec!(33.34)),
            ("b", dec!(-33.33)),
            ("c", dec!(-0.01)),
        ]);
        let plan = SettlePlanner::suggest(&sheet);
        assert_eq!(plan.payment_count(), 1);
        assert!(plan.settles(&sheet));
    }
}
