//! Budget analytics: keyword classification of spending into budget
//! buckets, monthly aggregation, and 50/30/20-style target comparison.

pub mod budget;
pub mod monthly;
