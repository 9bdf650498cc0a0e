//! Backtracking from values to the definitions that may flow into them
//! across zero or more phi nodes.
//!
//! Phi nodes are the only transparent definition kind: the walk recurses
//! into their incoming operands. Every other definition is opaque and is
//! reported to the visitor exactly once. A visited set keyed on value
//! identity makes cyclic phi graphs (loop-carried values) terminate.

use std::ops::ControlFlow;

use rustc_hash::FxHashSet;

use crate::shared::models::{Function, ValueDef, ValueId};

/// Walk backwards from `start`, reporting each non-phi definition reached.
///
/// The visitor decides whether to keep going: returning
/// `ControlFlow::Break(())` stops the walk immediately, which is how
/// early-exit queries signal success. The overall return value is `Break`
/// iff the visitor broke.
pub fn backtrack_phis<F>(function: &Function, start: ValueId, visit: &mut F) -> ControlFlow<()>
where
    F: FnMut(ValueId, &ValueDef) -> ControlFlow<()>,
{
    let mut seen = FxHashSet::default();
    walk(function, start, &mut seen, visit)
}

fn walk<F>(
    function: &Function,
    value: ValueId,
    seen: &mut FxHashSet<ValueId>,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(ValueId, &ValueDef) -> ControlFlow<()>,
{
    if !seen.insert(value) {
        return ControlFlow::Continue(());
    }
    match function.value(value) {
        ValueDef::Phi { incoming } => {
            for &(operand, _) in incoming {
                walk(function, operand, seen, visit)?;
            }
            ControlFlow::Continue(())
        }
        def => visit(value, def),
    }
}
