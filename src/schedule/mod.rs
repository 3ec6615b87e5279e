//! Recurring payment rules and their materialization into expenses.

pub mod recurring;
pub mod scheduler;
