//! Null-termination annotation inference
//!
//! The top-level fixed-point engine plus its lattice and persistence
//! format.

pub mod answer;
pub mod engine;
pub mod persistence;

pub use answer::Answer;
pub use engine::NullAnnotationEngine;
pub use persistence::{FunctionRecord, ResultsDoc};
