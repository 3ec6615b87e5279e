//! # splitledger
//!
//! Group expense splitting, balance, and settlement-suggestion engine.
//!
//! Given a group's shared expenses (each split among participants), direct
//! settlements, income, and recurring payment rules, this engine computes
//! each member's net balance and derives a minimal-transfer suggested
//! settlement plan.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: users, groups, expenses, settlements, income, balances
//! - **graph** — Pairwise debt graph (who owes whom, before netting)
//! - **plan** — Greedy minimal-transfer settlement suggestion
//! - **schedule** — Recurring payment rules and due-date rollforward
//! - **analytics** — Budget classification and 50/30/20 reporting
//! - **simulation** — Random group activity generation for testing

pub mod analytics;
pub mod core;
pub mod graph;
pub mod plan;
pub mod schedule;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::BalanceSheet;
    pub use crate::core::expense::Expense;
    pub use crate::core::group::Group;
    pub use crate::core::ledger::{GroupLedger, LedgerError};
    pub use crate::core::settlement::Settlement;
    pub use crate::core::user::UserId;
    pub use crate::graph::debt_graph::DebtGraph;
    pub use crate::plan::settle_up::{SettlePlanner, SettlementPlan, SuggestedPayment};
}
