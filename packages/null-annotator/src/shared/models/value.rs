//! SSA value definitions
//!
//! Every value computed by a function lives in that function's value arena;
//! a `ValueId` is an index into it. Formal parameters appear in the arena as
//! `Argument` definitions so that value-flow walks treat them uniformly.

use serde::{Deserialize, Serialize};

use super::cfg::BlockId;

/// Value identifier (index into a function's value arena)
pub type ValueId = u32;

/// Integer comparison predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Predicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
    Ult,
    Ule,
    Ugt,
    Uge,
}

/// A single SSA value definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueDef {
    /// Formal parameter of the owning function
    Argument { index: u32 },

    /// Integer constant
    ConstInt { value: i64 },

    /// SSA join: one incoming value per predecessor block
    Phi { incoming: Vec<(ValueId, BlockId)> },

    /// Memory load from an address value
    Load { address: ValueId },

    /// Address arithmetic: `pointer` offset by `indices`
    GetElementPtr { pointer: ValueId, indices: Vec<ValueId> },

    /// Integer comparison
    ICmp {
        predicate: Predicate,
        lhs: ValueId,
        rhs: ValueId,
    },

    /// Bitwise/logical or (fused branch conditions)
    Or { lhs: ValueId, rhs: ValueId },

    /// Sign extension
    SExt { operand: ValueId },

    /// Direct call to a named function
    Call { callee: String, args: Vec<ValueId> },

    /// Any other instruction kind; operands kept for completeness
    Opaque { operands: Vec<ValueId> },
}
