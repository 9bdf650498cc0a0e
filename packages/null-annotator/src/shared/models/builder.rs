//! Programmatic function construction
//!
//! Builder used by tests and by anything generating modules in-process.
//! Arguments are appended to the value arena first, so `ValueId` `i` is
//! always formal parameter `i`.

use super::cfg::{BasicBlock, BlockId, Terminator};
use super::module::{Function, Param};
use super::value::{Predicate, ValueDef, ValueId};

/// Incremental builder for a single function
pub struct FunctionBuilder {
    name: String,
    params: Vec<Param>,
    values: Vec<ValueDef>,
    blocks: Vec<BasicBlock>,
}

impl FunctionBuilder {
    /// Start a function; one `Argument` value is created per parameter name
    pub fn new(name: impl Into<String>, param_names: &[&str]) -> Self {
        let params = param_names.iter().map(|n| Param::new(*n)).collect();
        let values = (0..param_names.len())
            .map(|index| ValueDef::Argument {
                index: index as u32,
            })
            .collect();
        Self {
            name: name.into(),
            params,
            values,
            blocks: Vec::new(),
        }
    }

    /// Value id of formal parameter `index`
    pub fn arg(&self, index: u32) -> ValueId {
        index
    }

    fn push(&mut self, def: ValueDef) -> ValueId {
        let id = self.values.len() as ValueId;
        self.values.push(def);
        id
    }

    pub fn const_int(&mut self, value: i64) -> ValueId {
        self.push(ValueDef::ConstInt { value })
    }

    pub fn phi(&mut self, incoming: Vec<(ValueId, BlockId)>) -> ValueId {
        self.push(ValueDef::Phi { incoming })
    }

    pub fn load(&mut self, address: ValueId) -> ValueId {
        self.push(ValueDef::Load { address })
    }

    pub fn gep(&mut self, pointer: ValueId, indices: Vec<ValueId>) -> ValueId {
        self.push(ValueDef::GetElementPtr { pointer, indices })
    }

    pub fn icmp(&mut self, predicate: Predicate, lhs: ValueId, rhs: ValueId) -> ValueId {
        self.push(ValueDef::ICmp {
            predicate,
            lhs,
            rhs,
        })
    }

    pub fn or(&mut self, lhs: ValueId, rhs: ValueId) -> ValueId {
        self.push(ValueDef::Or { lhs, rhs })
    }

    pub fn sext(&mut self, operand: ValueId) -> ValueId {
        self.push(ValueDef::SExt { operand })
    }

    pub fn call(&mut self, callee: impl Into<String>, args: Vec<ValueId>) -> ValueId {
        self.push(ValueDef::Call {
            callee: callee.into(),
            args,
        })
    }

    pub fn opaque(&mut self, operands: Vec<ValueId>) -> ValueId {
        self.push(ValueDef::Opaque { operands })
    }

    /// Declare a block; terminator defaults to `ret void` until set
    pub fn block(&mut self, name: impl Into<String>) -> BlockId {
        let id = self.blocks.len() as BlockId;
        self.blocks
            .push(BasicBlock::new(name, Terminator::Ret { value: None }));
        id
    }

    /// Set a block's terminator
    pub fn terminate(&mut self, block: BlockId, terminator: Terminator) {
        self.blocks[block as usize].terminator = terminator;
    }

    /// Finish and return the function
    pub fn finish(self) -> Function {
        Function {
            name: self.name,
            params: self.params,
            values: self.values,
            blocks: self.blocks,
        }
    }
}
