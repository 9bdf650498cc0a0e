//! Length-check discovery
//!
//! For every single-index `gep` on a classified array parameter, record the
//! largest index the function may use, or mark the parameter unbounded when
//! no bound can be established. Parameters that are never indexed are
//! absent from the results.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::features::array_classification::ArrayClassification;
use crate::shared::models::{Function, ValueDef};

use super::ranges::IndexRangeProvider;

/// Index bound established for one array parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentBound {
    /// Largest index observed across all bounded accesses
    Bounded(i64),
    /// At least one access has no provable bound
    Unbounded,
}

/// Per-function length results, keyed by argument ordinal
#[derive(Debug, Clone, Default)]
pub struct LengthResults {
    bounds: FxHashMap<u32, ArgumentBound>,
}

impl LengthResults {
    /// Bound for an argument, if it was indexed at all
    pub fn bound_for(&self, argument: u32) -> Option<ArgumentBound> {
        self.bounds.get(&argument).copied()
    }

    /// Arguments with any recorded bound, sorted
    pub fn arguments(&self) -> Vec<u32> {
        let mut args: Vec<u32> = self.bounds.keys().copied().collect();
        args.sort_unstable();
        args
    }
}

/// Scan one function's indexing expressions
pub fn analyze_function(
    function: &Function,
    classification: &ArrayClassification,
    ranges: &dyn IndexRangeProvider,
) -> LengthResults {
    let mut max_indexes: FxHashMap<u32, i64> = FxHashMap::default();
    let mut not_bounded: FxHashSet<u32> = FxHashSet::default();

    for def in &function.values {
        let ValueDef::GetElementPtr { pointer, indices } = def else {
            continue;
        };
        if indices.len() != 1 {
            continue;
        }
        let ValueDef::Argument { index: argument } = function.value(*pointer) else {
            continue;
        };
        if !classification.is_array_parameter(&function.name, *argument) {
            continue;
        }
        let slot = indices[0];
        if let Some(upper) = ranges.upper_bound(function, slot) {
            let entry = max_indexes.entry(*argument).or_insert(upper);
            *entry = (*entry).max(upper);
        } else if let ValueDef::ConstInt { value } = function.value(slot) {
            // some range providers decline constants; fall back directly
            let entry = max_indexes.entry(*argument).or_insert(*value);
            *entry = (*entry).max(*value);
        } else {
            not_bounded.insert(*argument);
        }
    }

    let mut results = LengthResults::default();
    for (argument, max) in max_indexes {
        results.bounds.insert(argument, ArgumentBound::Bounded(max));
    }
    for argument in not_bounded {
        results.bounds.insert(argument, ArgumentBound::Unbounded);
    }
    results
}
