//! Control-flow graph types
//!
//! Blocks carry a name and a terminator; the instructions themselves live in
//! the owning function's value arena, so the CFG layer stays purely about
//! control flow.

use serde::{Deserialize, Serialize};

use super::value::ValueId;

/// Basic block identifier (index into a function's block list)
pub type BlockId = u32;

/// Block terminator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Terminator {
    /// Unconditional branch
    Br { target: BlockId },

    /// Conditional branch on a boolean value
    CondBr {
        condition: ValueId,
        true_target: BlockId,
        false_target: BlockId,
    },

    /// Function return
    Ret { value: Option<ValueId> },
}

impl Terminator {
    /// Successor blocks of this terminator, in branch order
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Br { target } => vec![*target],
            Terminator::CondBr {
                true_target,
                false_target,
                ..
            } => vec![*true_target, *false_target],
            Terminator::Ret { .. } => Vec::new(),
        }
    }
}

/// CFG basic block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    /// Human-readable block label
    pub name: String,
    /// Block terminator
    pub terminator: Terminator,
}

impl BasicBlock {
    /// Create a block with the given label and terminator
    pub fn new(name: impl Into<String>, terminator: Terminator) -> Self {
        Self {
            name: name.into(),
            terminator,
        }
    }

    /// Successor blocks
    pub fn successors(&self) -> Vec<BlockId> {
        self.terminator.successors()
    }
}
