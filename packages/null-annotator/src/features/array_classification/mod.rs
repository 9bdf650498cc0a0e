//! Array-parameter classification from external tool output

pub mod reader;

pub use reader::{ArrayClassification, ARRAY_MARKER};
