//! Array index bound analysis
//!
//! Establishes, per array parameter, the largest index a function may use,
//! or that no bound exists. Runs independently of the sentinel analysis.

pub mod finder;
pub mod ranges;

pub use finder::{analyze_function, ArgumentBound, LengthResults};
pub use ranges::{ConstantRanges, IndexRangeProvider};
