//! Analysis features
//!
//! Each feature is one pass over the shared IR models; data flows
//! classification → sentinel/length finding → annotation fixed point.

pub mod array_classification;
pub mod length_checks;
pub mod null_annotation;
pub mod sentinel_checks;
pub mod value_flow;
