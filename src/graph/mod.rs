//! Pairwise debt graph: who owes whom before any netting.

pub mod debt_graph;
