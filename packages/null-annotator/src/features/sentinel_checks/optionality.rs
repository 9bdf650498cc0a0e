//! Sentinel-check optionality search
//!
//! Answers: is there a nontrivial path from loop entry back to loop entry
//! that never passes through a sentinel check? Sentinel-check exiting
//! blocks are pre-added to `found`, the current block starts at loop entry,
//! and the goal is loop entry.
//!
//! `reachable` marks the current block found before any other test, so a
//! pre-seeded sentinel block is never traversed; the search starts from the
//! header's successors, so only a nontrivial return to the header counts.

use rustc_hash::FxHashSet;

use crate::shared::models::{BlockId, Function, Loop};

fn reachable(
    function: &Function,
    lp: &Loop,
    found_so_far: &mut FxHashSet<BlockId>,
    current: BlockId,
    goal: BlockId,
) -> bool {
    // already explored here, or an intentionally closed-off sentinel check
    if !found_so_far.insert(current) {
        return false;
    }

    if current == goal {
        return true;
    }

    // not allowed to leave this loop
    if !lp.contains(current) {
        return false;
    }

    reachable_nontrivially(function, lp, found_so_far, current, goal)
}

fn reachable_nontrivially(
    function: &Function,
    lp: &Loop,
    found_so_far: &mut FxHashSet<BlockId>,
    current: BlockId,
    goal: BlockId,
) -> bool {
    // look for a reachable path across any one successor
    function
        .successors(current)
        .into_iter()
        .any(|succ| reachable(function, lp, found_so_far, succ, goal))
}

/// True iff the loop can iterate without passing through any pre-seeded
/// sentinel-check block.
pub fn sentinel_checks_are_optional(
    function: &Function,
    lp: &Loop,
    found_so_far: &mut FxHashSet<BlockId>,
) -> bool {
    let entry = lp.header;
    reachable_nontrivially(function, lp, found_so_far, entry, entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{natural_loops, FunctionBuilder, Predicate, Terminator};

    /// header -> check -> latch -> header; check exits the loop
    fn loop_with_check(second_path: bool) -> (Function, Loop) {
        let mut fb = FunctionBuilder::new("f", &["a"]);
        let entry = fb.block("entry");
        let header = fb.block("header");
        let check = fb.block("check");
        let latch = fb.block("latch");
        let exit = fb.block("exit");
        let bypass = if second_path {
            Some(fb.block("bypass"))
        } else {
            None
        };
        let zero = fb.const_int(0);
        let cond = fb.icmp(Predicate::Eq, fb.arg(0), zero);

        fb.terminate(entry, Terminator::Br { target: header });
        match bypass {
            None => fb.terminate(header, Terminator::Br { target: check }),
            Some(bypass) => {
                fb.terminate(
                    header,
                    Terminator::CondBr {
                        condition: cond,
                        true_target: check,
                        false_target: bypass,
                    },
                );
                fb.terminate(bypass, Terminator::Br { target: latch });
            }
        }
        fb.terminate(
            check,
            Terminator::CondBr {
                condition: cond,
                true_target: exit,
                false_target: latch,
            },
        );
        fb.terminate(latch, Terminator::Br { target: header });
        fb.terminate(exit, Terminator::Ret { value: None });

        let func = fb.finish();
        let lp = natural_loops(&func).into_iter().next().unwrap();
        (func, lp)
    }

    #[test]
    fn sole_exit_check_is_not_optional() {
        let (func, lp) = loop_with_check(false);
        let mut found: FxHashSet<BlockId> = [2].into_iter().collect();
        assert!(!sentinel_checks_are_optional(&func, &lp, &mut found));
    }

    #[test]
    fn bypass_path_makes_check_optional() {
        let (func, lp) = loop_with_check(true);
        let mut found: FxHashSet<BlockId> = [2].into_iter().collect();
        assert!(sentinel_checks_are_optional(&func, &lp, &mut found));
    }

    #[test]
    fn trivial_self_loop_does_not_count_as_bypass() {
        // header branches straight back to itself and into the check
        let mut fb = FunctionBuilder::new("f", &["a"]);
        let entry = fb.block("entry");
        let header = fb.block("header");
        let exit = fb.block("exit");
        let zero = fb.const_int(0);
        let cond = fb.icmp(Predicate::Eq, fb.arg(0), zero);
        fb.terminate(entry, Terminator::Br { target: header });
        fb.terminate(
            header,
            Terminator::CondBr {
                condition: cond,
                true_target: exit,
                false_target: header,
            },
        );
        fb.terminate(exit, Terminator::Ret { value: None });
        let func = fb.finish();
        let lp = natural_loops(&func).into_iter().next().unwrap();

        // the header itself is the (seeded) sentinel check; the self edge
        // reaches it only through the seeded block, so no bypass exists
        let mut found: FxHashSet<BlockId> = [header].into_iter().collect();
        assert!(!sentinel_checks_are_optional(&func, &lp, &mut found));
    }
}
