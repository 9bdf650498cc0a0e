//! Shared IR data models
//!
//! These types are used across every analysis feature, so they live here to
//! avoid circular dependencies between features.

pub mod builder;
pub mod cfg;
pub mod loops;
pub mod module;
pub mod value;

pub use builder::FunctionBuilder;
pub use cfg::{BasicBlock, BlockId, Terminator};
pub use loops::{natural_loops, Loop};
pub use module::{Function, Module, Param, ParamId};
pub use value::{Predicate, ValueDef, ValueId};
