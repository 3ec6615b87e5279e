use crate::core::expense::Expense;
use crate::core::ledger::{GroupLedger, LedgerError};
use chrono::NaiveDate;
use log::{debug, info};

/// Materializes due recurring rules into concrete expenses.
pub struct Scheduler;

impl Scheduler {
    /// Run every active rule that is due on or before `today`.
    ///
    /// A rule overdue by several periods fires once per elapsed period
    /// (catch-up after downtime), its `next_due` rolling forward each time
    /// until it lands in the future. Inactive rules are skipped untouched.
    ///
    /// Returns the expenses that were materialized, in firing order.
    pub fn run_due(ledger: &mut GroupLedger, today: NaiveDate) -> Result<Vec<Expense>, LedgerError> {
        let mut materialized = Vec::new();

        // Work on a detached copy of the rules so the ledger can ingest the
        // generated expenses mid-loop; roll the rules back in afterwards.
        let mut rules: Vec<_> = ledger.recurring().to_vec();

        for rule in &mut rules {
            if !rule.is_active() {
                debug!("rule {} inactive, skipping", rule.id());
                continue;
            }
            while rule.is_due(today) {
                let mut expense = Expense::split_evenly(
                    rule.payer().clone(),
                    rule.amount(),
                    rule.category(),
                    rule.next_due(),
                    rule.participants().iter().cloned(),
                );
                if let Some(description) = rule.description() {
                    expense = expense.with_description(description);
                }
                info!(
                    "materializing recurring '{}' for {} on {}",
                    rule.category(),
                    rule.amount(),
                    rule.next_due()
                );
                ledger.record_expense(expense.clone())?;
                materialized.push(expense);
                rule.roll_forward();
            }
        }

        for (slot, rolled) in ledger.recurring_mut().iter_mut().zip(rules) {
            *slot = rolled;
        }
        Ok(materialized)
    }
}
