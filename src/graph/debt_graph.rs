use crate::core::balance::BalanceSheet;
use crate::core::expense::Expense;
use crate::core::settlement::Settlement;
use crate::core::user::UserId;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A directed graph of pairwise debts between group members.
///
/// Each edge aggregates how much one member owes another from raw expense
/// shares (a participant owes their share to the payer), offset by any
/// settlements paid along the same edge. This is the "who owes whom" view
/// before balances are netted — useful for itemized listings and for
/// netting a single pair.
///
/// # Examples
///
/// ```
/// use splitledger::core::expense::Expense;
/// use splitledger::graph::debt_graph::DebtGraph;
/// use splitledger::core::user::UserId;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let mut graph = DebtGraph::new();
/// graph.add_expense(&Expense::split_evenly(
///     UserId::new("alice"),
///     dec!(60),
///     "dining",
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     [UserId::new("alice"), UserId::new("bob")],
/// ));
///
/// assert_eq!(graph.amount_owed(&UserId::new("bob"), &UserId::new("alice")), dec!(30));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DebtGraph {
    /// Aggregated edges: (debtor, creditor) -> total owed.
    edges: HashMap<(UserId, UserId), Decimal>,
    /// All members seen on any edge.
    members: HashSet<UserId>,
}

/// The bilateral net between two members after offsetting mutual debts.
#[derive(Debug, Clone, Serialize)]
pub struct PairwiseNet {
    pub a: UserId,
    pub b: UserId,
    /// Gross amount `a` owes `b`.
    pub gross_a_to_b: Decimal,
    /// Gross amount `b` owes `a`.
    pub gross_b_to_a: Decimal,
    /// Net amount: positive means `a` owes `b` net, negative means `b` owes `a` net.
    pub net_amount: Decimal,
    /// Amount cancelled by offsetting the two directions.
    pub cancelled: Decimal,
}

impl DebtGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expense: each participant (other than the payer) owes their
    /// share to the payer.
    pub fn add_expense(&mut self, expense: &Expense) {
        self.members.insert(expense.payer().clone());
        for (user, share) in expense.shares() {
            self.members.insert(user.clone());
            if user == expense.payer() || *share == Decimal::ZERO {
                continue;
            }
            let key = (user.clone(), expense.payer().clone());
            *self.edges.entry(key).or_insert(Decimal::ZERO) += *share;
        }
    }

    /// Add a settlement: paying someone reduces the debt along that edge
    /// (and can push it past zero into a debt in the other direction).
    pub fn add_settlement(&mut self, settlement: &Settlement) {
        self.members.insert(settlement.from().clone());
        self.members.insert(settlement.to().clone());
        let key = (settlement.from().clone(), settlement.to().clone());
        *self.edges.entry(key).or_insert(Decimal::ZERO) -= settlement.amount();
    }

    /// Aggregated amount `debtor` owes `creditor` along the direct edge.
    /// Negative values mean the payments along this edge overshot the debt.
    pub fn amount_owed(&self, debtor: &UserId, creditor: &UserId) -> Decimal {
        self.edges
            .get(&(debtor.clone(), creditor.clone()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// All members seen in the graph.
    pub fn members(&self) -> &HashSet<UserId> {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// All non-zero edges as (debtor, creditor, amount), sorted for
    /// deterministic output.
    pub fn edges(&self) -> Vec<(&UserId, &UserId, Decimal)> {
        let mut edges: Vec<_> = self
            .edges
            .iter()
            .filter(|(_, amt)| **amt != Decimal::ZERO)
            .map(|((d, c), &amt)| (d, c, amt))
            .collect();
        edges.sort_by(|x, y| x.0.cmp(y.0).then_with(|| x.1.cmp(y.1)));
        edges
    }

    /// Debts owed BY a member: (creditor, amount) pairs.
    pub fn outgoing(&self, user: &UserId) -> Vec<(&UserId, Decimal)> {
        self.edges
            .iter()
            .filter(|((d, _), amt)| d == user && **amt > Decimal::ZERO)
            .map(|((_, creditor), &amt)| (creditor, amt))
            .collect()
    }

    /// Debts owed TO a member: (debtor, amount) pairs.
    pub fn incoming(&self, user: &UserId) -> Vec<(&UserId, Decimal)> {
        self.edges
            .iter()
            .filter(|((_, c), amt)| c == user && **amt > Decimal::ZERO)
            .map(|((debtor, _), &amt)| (debtor, amt))
            .collect()
    }

    /// Offset the mutual debts between two members.
    ///
    /// If A owes B 100 and B owes A 60, the net is A owes B 40 and 120 of
    /// gross debt cancels.
    pub fn pairwise_net(&self, a: &UserId, b: &UserId) -> PairwiseNet {
        let a_to_b = self.amount_owed(a, b).max(Decimal::ZERO)
            + (-self.amount_owed(b, a)).max(Decimal::ZERO);
        let b_to_a = self.amount_owed(b, a).max(Decimal::ZERO)
            + (-self.amount_owed(a, b)).max(Decimal::ZERO);

        let net = a_to_b - b_to_a;
        let gross = a_to_b + b_to_a;
        let cancelled = gross - net.abs();

        PairwiseNet {
            a: a.clone(),
            b: b.clone(),
            gross_a_to_b: a_to_b,
            gross_b_to_a: b_to_a,
            net_amount: net,
            cancelled,
        }
    }

    /// Collapse the pairwise edges into net per-member balances.
    ///
    /// The result agrees with applying the raw expenses and settlements to
    /// a [`BalanceSheet`] directly.
    pub fn to_balances(&self) -> BalanceSheet {
        let mut positions: std::collections::BTreeMap<UserId, Decimal> =
            self.members.iter().cloned().map(|u| (u, Decimal::ZERO)).collect();
        for ((debtor, creditor), amount) in &self.edges {
            *positions.get_mut(debtor).unwrap() -= *amount;
            *positions.get_mut(creditor).unwrap() += *amount;
        }
        BalanceSheet::from_positions(positions)
    }
}
