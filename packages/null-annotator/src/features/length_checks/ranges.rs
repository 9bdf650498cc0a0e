//! Index range port
//!
//! Seam for the numeric range analysis that bounds index expressions. Any
//! implementation can be plugged into the length-check finder; the default
//! one folds constants through sign extensions and phi joins.

use rustc_hash::FxHashSet;

use crate::shared::models::{Function, ValueDef, ValueId};

/// Upper-bound provider for index values
///
/// `upper_bound` returns the largest value an index may take, or `None`
/// when the range is unknown.
pub trait IndexRangeProvider {
    fn upper_bound(&self, function: &Function, value: ValueId) -> Option<i64>;
}

/// Constant-folding range provider
///
/// Handles integer constants, sign extensions of bounded values, and phi
/// joins whose incoming values are all bounded. Cyclic (loop-carried) phis
/// are unknown.
#[derive(Debug, Default)]
pub struct ConstantRanges;

impl ConstantRanges {
    pub fn new() -> Self {
        Self
    }

    fn bound(
        &self,
        function: &Function,
        value: ValueId,
        in_progress: &mut FxHashSet<ValueId>,
    ) -> Option<i64> {
        if !in_progress.insert(value) {
            // cycle: loop-carried value, no static bound
            return None;
        }
        let result = match function.value(value) {
            ValueDef::ConstInt { value } => Some(*value),
            ValueDef::SExt { operand } => self.bound(function, *operand, in_progress),
            ValueDef::Phi { incoming } => {
                let mut max = None;
                for (operand, _) in incoming {
                    let b = self.bound(function, *operand, in_progress)?;
                    max = Some(max.map_or(b, |m: i64| m.max(b)));
                }
                max
            }
            _ => None,
        };
        in_progress.remove(&value);
        result
    }
}

impl IndexRangeProvider for ConstantRanges {
    fn upper_bound(&self, function: &Function, value: ValueId) -> Option<i64> {
        let mut in_progress = FxHashSet::default();
        self.bound(function, value, &mut in_progress)
    }
}
