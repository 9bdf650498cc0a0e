//! Reachability queries built on phi backtracking
//!
//! Both queries walk backwards from a start value and succeed as soon as
//! the goal is reached, using the walker's early-exit signal.

use std::ops::ControlFlow;

use crate::shared::models::{Function, ValueDef, ValueId};

use super::backtrack::backtrack_phis;

/// Does formal parameter `goal_index` possibly flow into `start`?
pub fn argument_reaches_value(function: &Function, goal_index: u32, start: ValueId) -> bool {
    backtrack_phis(function, start, &mut |_, def| match def {
        ValueDef::Argument { index } if *index == goal_index => ControlFlow::Break(()),
        _ => ControlFlow::Continue(()),
    })
    .is_break()
}

/// Does the value `goal` possibly flow into `start`?
pub fn value_reaches_value(function: &Function, goal: ValueId, start: ValueId) -> bool {
    backtrack_phis(function, start, &mut |id, _| {
        if id == goal {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .is_break()
}
