//! Module, function, and parameter models
//!
//! A `Module` is one compiled translation unit: a list of functions, each
//! with a parameter list, an SSA value arena, and a block list whose first
//! entry is the function entry. All types are serde-serializable so modules
//! load from JSON files and tests can build fixtures programmatically.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

use super::cfg::{BasicBlock, BlockId};
use super::value::{ValueDef, ValueId};

/// Formal parameter of a function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name (for diagnostics and persistence)
    pub name: String,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Stable identity of a formal parameter: owning function plus ordinal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamId {
    /// Owning function name
    pub function: String,
    /// Zero-based ordinal position
    pub index: u32,
}

impl ParamId {
    pub fn new(function: impl Into<String>, index: u32) -> Self {
        Self {
            function: function.into(),
            index,
        }
    }
}

/// A single function in SSA form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Function name (module-unique)
    pub name: String,
    /// Formal parameters, in declaration order
    pub params: Vec<Param>,
    /// Value arena; `ValueId` indexes into this
    pub values: Vec<ValueDef>,
    /// Basic blocks; index 0 is the entry block
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    /// Entry block id
    pub fn entry(&self) -> BlockId {
        0
    }

    /// Definition of a value
    pub fn value(&self, id: ValueId) -> &ValueDef {
        &self.values[id as usize]
    }

    /// Block by id
    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id as usize]
    }

    /// Successors of a block
    pub fn successors(&self, id: BlockId) -> Vec<BlockId> {
        self.block(id).successors()
    }

    /// Predecessor map over all blocks
    pub fn predecessor_map(&self) -> FxHashMap<BlockId, Vec<BlockId>> {
        let mut preds: FxHashMap<BlockId, Vec<BlockId>> = FxHashMap::default();
        for (id, block) in self.blocks.iter().enumerate() {
            for succ in block.successors() {
                preds.entry(succ).or_default().push(id as BlockId);
            }
        }
        preds
    }

    /// All call instructions in this function, as value ids
    pub fn call_sites(&self) -> Vec<ValueId> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, def)| matches!(def, ValueDef::Call { .. }))
            .map(|(id, _)| id as ValueId)
            .collect()
    }
}

/// One compiled module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Functions, in declaration order
    pub functions: Vec<Function>,
}

impl Module {
    /// Look up a function by name
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Parse a module from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a module from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
