//! Loop sentinel-check analysis
//!
//! Finds each branch used to exit a loop when a sentinel value is found in
//! an array, and whether the loop can be traversed without the check.

pub mod finder;
pub mod optionality;

pub use finder::{analyze_function, FunctionResults, LoopChecks, SentinelCheck};
