//! Random group-activity generation for benchmarks and the CLI.

pub mod generator;
