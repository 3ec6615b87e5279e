//! Suggested settlement plans: greedy minimal-transfer debt netting.

pub mod settle_up;
