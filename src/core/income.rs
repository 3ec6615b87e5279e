use crate::analytics::budget::BudgetKind;
use crate::core::user::UserId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// An income record for a group member.
///
/// Income never moves balances between members; it exists so budget
/// analytics can express spending as a share of what came in, and so a
/// member can earmark portions of a paycheck into budget buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeEntry {
    /// Unique identifier for this entry.
    id: Uuid,
    /// The member who received the income.
    recipient: UserId,
    /// The amount received. Must be positive.
    amount: Decimal,
    /// The date the income was received.
    date: NaiveDate,
    /// Source label ("salary", "refund", ...).
    source: String,
    /// Optional earmarks per budget bucket. Must not exceed `amount`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    allocations: BTreeMap<BudgetKind, Decimal>,
}

impl IncomeEntry {
    /// Create a new income entry.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive.
    pub fn new(
        recipient: UserId,
        amount: Decimal,
        date: NaiveDate,
        source: impl Into<String>,
    ) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Income amount must be positive, got {}",
            amount
        );
        Self {
            id: Uuid::new_v4(),
            recipient,
            amount,
            date,
            source: source.into(),
            allocations: BTreeMap::new(),
        }
    }

    /// Earmark part of this income for a budget bucket.
    pub fn with_allocation(mut self, kind: BudgetKind, amount: Decimal) -> Self {
        *self.allocations.entry(kind).or_insert(Decimal::ZERO) += amount;
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn recipient(&self) -> &UserId {
        &self.recipient
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn allocations(&self) -> &BTreeMap<BudgetKind, Decimal> {
        &self.allocations
    }

    /// Total earmarked across all buckets.
    pub fn allocated_total(&self) -> Decimal {
        self.allocations.values().sum()
    }

    /// True when earmarks are non-negative and do not exceed the amount.
    pub fn allocations_are_valid(&self) -> bool {
        self.allocations.values().all(|a| *a >= Decimal::ZERO)
            && self.allocated_total() <= self.amount
    }
}
