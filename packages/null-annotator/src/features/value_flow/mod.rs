//! Phi-aware backward value flow
//!
//! Generic walker that traces a value back through SSA joins, plus the two
//! reachability queries the annotation engine asks with it.

pub mod backtrack;
pub mod reaches;

pub use backtrack::backtrack_phis;
pub use reaches::{argument_reaches_value, value_reaches_value};
