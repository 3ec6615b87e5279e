//! Foundational domain types: members, groups, expenses, settlements,
//! income, and net balances.

pub mod balance;
pub mod category;
pub mod expense;
pub mod group;
pub mod income;
pub mod ledger;
pub mod settlement;
pub mod user;
