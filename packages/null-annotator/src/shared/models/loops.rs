//! Natural loop detection
//!
//! Iterative dominator computation over reachable blocks, back-edge
//! detection, and natural-loop body collection. Loops sharing a header are
//! merged into one body, matching the usual loop-info convention.

use rustc_hash::{FxHashMap, FxHashSet};

use super::cfg::BlockId;
use super::module::Function;

/// A natural loop: header block plus the full body block set
#[derive(Debug, Clone)]
pub struct Loop {
    /// Loop header (target of at least one back edge)
    pub header: BlockId,
    /// All blocks in the loop body, header included
    pub blocks: FxHashSet<BlockId>,
}

impl Loop {
    /// Whether the loop body contains a block
    pub fn contains(&self, block: BlockId) -> bool {
        self.blocks.contains(&block)
    }

    /// Blocks inside the loop with at least one successor outside it
    pub fn exiting_blocks(&self, function: &Function) -> Vec<BlockId> {
        let mut exiting: Vec<BlockId> = self
            .blocks
            .iter()
            .copied()
            .filter(|&b| {
                function
                    .successors(b)
                    .iter()
                    .any(|succ| !self.contains(*succ))
            })
            .collect();
        exiting.sort_unstable();
        exiting
    }
}

/// Blocks reachable from the entry block
fn reachable_blocks(function: &Function) -> FxHashSet<BlockId> {
    let mut seen = FxHashSet::default();
    let mut stack = vec![function.entry()];
    while let Some(block) = stack.pop() {
        if seen.insert(block) {
            stack.extend(function.successors(block));
        }
    }
    seen
}

/// Dominator sets for every reachable block
fn dominator_sets(
    function: &Function,
    reachable: &FxHashSet<BlockId>,
) -> FxHashMap<BlockId, FxHashSet<BlockId>> {
    let preds = function.predecessor_map();
    let mut dom: FxHashMap<BlockId, FxHashSet<BlockId>> = FxHashMap::default();

    let entry = function.entry();
    for &block in reachable {
        if block == entry {
            dom.insert(block, [entry].into_iter().collect());
        } else {
            dom.insert(block, reachable.clone());
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for &block in reachable {
            if block == entry {
                continue;
            }
            let mut new_dom: Option<FxHashSet<BlockId>> = None;
            for pred in preds.get(&block).map(|v| v.as_slice()).unwrap_or(&[]) {
                if !reachable.contains(pred) {
                    continue;
                }
                let pred_dom = &dom[pred];
                new_dom = Some(match new_dom {
                    None => pred_dom.clone(),
                    Some(acc) => acc.intersection(pred_dom).copied().collect(),
                });
            }
            let mut new_dom = new_dom.unwrap_or_default();
            new_dom.insert(block);
            if new_dom != dom[&block] {
                dom.insert(block, new_dom);
                changed = true;
            }
        }
    }
    dom
}

/// All natural loops of a function, ordered by header id
pub fn natural_loops(function: &Function) -> Vec<Loop> {
    let reachable = reachable_blocks(function);
    let dom = dominator_sets(function, &reachable);
    let preds = function.predecessor_map();

    // back edge tail -> header where the header dominates the tail
    let mut bodies: FxHashMap<BlockId, FxHashSet<BlockId>> = FxHashMap::default();
    for &tail in &reachable {
        for header in function.successors(tail) {
            if !dom[&tail].contains(&header) {
                continue;
            }
            let body = bodies.entry(header).or_default();
            body.insert(header);
            // walk backwards from the tail until the header closes the region
            let mut stack = vec![tail];
            while let Some(block) = stack.pop() {
                if body.insert(block) {
                    for pred in preds.get(&block).map(|v| v.as_slice()).unwrap_or(&[]) {
                        if reachable.contains(pred) {
                            stack.push(*pred);
                        }
                    }
                }
            }
        }
    }

    let mut headers: Vec<BlockId> = bodies.keys().copied().collect();
    headers.sort_unstable();
    headers
        .into_iter()
        .map(|header| Loop {
            header,
            blocks: bodies.remove(&header).unwrap_or_default(),
        })
        .collect()
}
