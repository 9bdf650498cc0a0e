//! Sentinel-check discovery
//!
//! Scans every natural loop of a function for exiting branches that test an
//! element of an array parameter against the zero sentinel and leave the
//! loop when the sentinel is found. Tolerated condition shapes:
//!
//! ```text
//! %0 = getelementptr %pointer, %slot
//! %1 = load %0
//! %2 = icmp eq|ne (%1 | sext %1), 0
//! br %2, %trueBlock, %falseBlock
//! ```
//!
//! and the same comparison fused into either operand of an `or` (optimized
//! builds combine a sentinel test with another exit condition this way).

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::features::array_classification::ArrayClassification;
use crate::shared::models::{
    natural_loops, BlockId, Function, Loop, Predicate, Terminator, ValueDef, ValueId,
};

use super::optionality::sentinel_checks_are_optional;

/// One recognized exit-on-sentinel branch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SentinelCheck {
    /// Exiting block holding the recognized branch
    pub exiting_block: BlockId,
    /// Ordinal of the array parameter being tested
    pub argument: u32,
}

/// Sentinel checks of one loop plus their joint optionality
#[derive(Debug, Clone, Default)]
pub struct LoopChecks {
    /// Recognized checks; empty when the loop tests no sentinel
    pub checks: Vec<SentinelCheck>,
    /// True iff the loop can iterate without passing any recorded check
    /// (vacuously true when `checks` is empty)
    pub optional: bool,
}

/// Per-function results, keyed by loop header
#[derive(Debug, Clone, Default)]
pub struct FunctionResults {
    by_header: FxHashMap<BlockId, LoopChecks>,
}

impl FunctionResults {
    /// Results for one loop, by header block
    pub fn for_header(&self, header: BlockId) -> Option<&LoopChecks> {
        self.by_header.get(&header)
    }

    /// Loop headers analyzed, sorted
    pub fn headers(&self) -> Vec<BlockId> {
        let mut headers: Vec<BlockId> = self.by_header.keys().copied().collect();
        headers.sort_unstable();
        headers
    }

    /// Does some loop have a non-optional check on this argument?
    pub fn has_non_optional_check(&self, argument: u32) -> bool {
        self.by_header.values().any(|lc| {
            !lc.optional && lc.checks.iter().any(|check| check.argument == argument)
        })
    }

    /// Does any loop check this argument at all?
    pub fn has_any_check(&self, argument: u32) -> bool {
        self.by_header
            .values()
            .any(|lc| lc.checks.iter().any(|check| check.argument == argument))
    }
}

/// Outcome of matching one branch condition
struct SentinelMatch {
    argument: u32,
    predicate: Predicate,
}

/// Match `load (gep arg, slot)` or `sext (load (gep arg, slot))`
fn match_element_load(function: &Function, value: ValueId) -> Option<u32> {
    let loaded = match function.value(value) {
        ValueDef::SExt { operand } => *operand,
        _ => value,
    };
    let ValueDef::Load { address } = function.value(loaded) else {
        return None;
    };
    let ValueDef::GetElementPtr { pointer, indices } = function.value(*address) else {
        return None;
    };
    if indices.len() != 1 {
        return None;
    }
    match function.value(*pointer) {
        ValueDef::Argument { index } => Some(*index),
        _ => None,
    }
}

/// Match `icmp pred (element load), 0`
fn match_compare_zero(function: &Function, value: ValueId) -> Option<SentinelMatch> {
    let ValueDef::ICmp {
        predicate,
        lhs,
        rhs,
    } = function.value(value)
    else {
        return None;
    };
    let ValueDef::ConstInt { value: 0 } = function.value(*rhs) else {
        return None;
    };
    match_element_load(function, *lhs).map(|argument| SentinelMatch {
        argument,
        predicate: *predicate,
    })
}

/// Match the full condition shape, with or without a fusing `or`
fn match_sentinel_condition(function: &Function, condition: ValueId) -> Option<SentinelMatch> {
    if let Some(found) = match_compare_zero(function, condition) {
        return Some(found);
    }
    if let ValueDef::Or { lhs, rhs } = function.value(condition) {
        return match_compare_zero(function, *lhs).or_else(|| match_compare_zero(function, *rhs));
    }
    None
}

/// Recognize the sentinel checks of one loop
fn loop_checks(
    function: &Function,
    classification: &ArrayClassification,
    lp: &Loop,
) -> Vec<SentinelCheck> {
    let mut checks = Vec::new();
    for exiting_block in lp.exiting_blocks(function) {
        let Terminator::CondBr {
            condition,
            true_target,
            false_target,
        } = &function.block(exiting_block).terminator
        else {
            continue;
        };
        let Some(found) = match_sentinel_condition(function, *condition) else {
            continue;
        };
        if !classification.is_array_parameter(&function.name, found.argument) {
            continue;
        }
        // check that we actually leave the loop when the sentinel is found
        let sentinel_destination = match found.predicate {
            Predicate::Eq => *true_target,
            Predicate::Ne => *false_target,
            _ => continue,
        };
        if lp.contains(sentinel_destination) {
            debug!(
                function = %function.name,
                block = %function.block(exiting_block).name,
                "sentinel destination still inside the loop; rejecting"
            );
            continue;
        }
        debug!(
            function = %function.name,
            block = %function.block(exiting_block).name,
            argument = found.argument,
            "found possible sentinel check"
        );
        checks.push(SentinelCheck {
            exiting_block,
            argument: found.argument,
        });
    }
    checks
}

/// Analyze every natural loop of a function
pub fn analyze_function(
    function: &Function,
    classification: &ArrayClassification,
) -> FunctionResults {
    let mut results = FunctionResults::default();
    for lp in natural_loops(function) {
        let checks = loop_checks(function, classification, &lp);
        if checks.is_empty() {
            debug!(function = %function.name, header = lp.header, "no sentinel checks in this loop");
            results
                .by_header
                .insert(lp.header, LoopChecks { checks, optional: true });
            continue;
        }
        let mut found_so_far: FxHashSet<BlockId> =
            checks.iter().map(|check| check.exiting_block).collect();
        let optional = sentinel_checks_are_optional(function, &lp, &mut found_so_far);
        debug!(
            function = %function.name,
            header = lp.header,
            optional,
            checks = checks.len(),
            "sentinel checks analyzed"
        );
        results
            .by_header
            .insert(lp.header, LoopChecks { checks, optional });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::array_classification::ArrayClassification;
    use crate::shared::models::{FunctionBuilder, Module, Terminator};

    fn classify(module: &Module, json: &str) -> ArrayClassification {
        ArrayClassification::from_json_str(json, module).unwrap()
    }

    /// while (s[i] != 0) i++;  -- the check is the only exit
    fn sentinel_scan_function(predicate: Predicate) -> Function {
        let mut fb = FunctionBuilder::new("scan", &["s"]);
        let entry = fb.block("entry");
        let header = fb.block("header");
        let latch = fb.block("latch");
        let exit = fb.block("exit");
        let zero = fb.const_int(0);
        let one = fb.const_int(1);
        let index = fb.phi(vec![(zero, entry), (one, latch)]);
        let slot = fb.gep(fb.arg(0), vec![index]);
        let element = fb.load(slot);
        let widened = fb.sext(element);
        let cmp = fb.icmp(predicate, widened, zero);
        let (on_true, on_false) = match predicate {
            Predicate::Eq => (exit, latch),
            _ => (latch, exit),
        };
        fb.terminate(entry, Terminator::Br { target: header });
        fb.terminate(
            header,
            Terminator::CondBr {
                condition: cmp,
                true_target: on_true,
                false_target: on_false,
            },
        );
        fb.terminate(latch, Terminator::Br { target: header });
        fb.terminate(exit, Terminator::Ret { value: None });
        fb.finish()
    }

    const SCAN_CLASSIFICATION: &str = r#"{
        "libraryFunctions": {
            "scan": {
                "foreignFunctionParameters": [
                    {"parameterAnnotations": ["PAArray"]}
                ]
            }
        }
    }"#;

    #[test]
    fn recognizes_eq_sentinel_check_as_sole_exit() {
        let func = sentinel_scan_function(Predicate::Eq);
        let module = Module {
            functions: vec![func.clone()],
        };
        let classification = classify(&module, SCAN_CLASSIFICATION);
        let results = analyze_function(&func, &classification);

        assert!(results.has_non_optional_check(0));
        assert!(results.has_any_check(0));
        let lc = results.for_header(1).unwrap();
        assert_eq!(lc.checks.len(), 1);
        assert_eq!(lc.checks[0].argument, 0);
        assert!(!lc.optional);
    }

    #[test]
    fn recognizes_ne_sentinel_check() {
        let func = sentinel_scan_function(Predicate::Ne);
        let module = Module {
            functions: vec![func.clone()],
        };
        let classification = classify(&module, SCAN_CLASSIFICATION);
        let results = analyze_function(&func, &classification);
        assert!(results.has_non_optional_check(0));
    }

    #[test]
    fn other_predicates_are_rejected() {
        let func = sentinel_scan_function(Predicate::Slt);
        let module = Module {
            functions: vec![func.clone()],
        };
        let classification = classify(&module, SCAN_CLASSIFICATION);
        let results = analyze_function(&func, &classification);
        assert!(!results.has_any_check(0));
    }

    #[test]
    fn non_array_parameter_is_rejected() {
        let func = sentinel_scan_function(Predicate::Eq);
        let module = Module {
            functions: vec![func.clone()],
        };
        let classification = classify(
            &module,
            r#"{
                "libraryFunctions": {
                    "scan": {
                        "foreignFunctionParameters": [
                            {"parameterAnnotations": []}
                        ]
                    }
                }
            }"#,
        );
        let results = analyze_function(&func, &classification);
        assert!(!results.has_any_check(0));
    }

    #[test]
    fn sentinel_destination_inside_loop_is_rejected() {
        // eq branch jumps to the latch (inside), ne side exits: the branch
        // stays in the loop when the sentinel is found, so no check
        let mut fb = FunctionBuilder::new("scan", &["s"]);
        let entry = fb.block("entry");
        let header = fb.block("header");
        let latch = fb.block("latch");
        let exit = fb.block("exit");
        let zero = fb.const_int(0);
        let index = fb.phi(vec![(zero, entry)]);
        let slot = fb.gep(fb.arg(0), vec![index]);
        let element = fb.load(slot);
        let cmp = fb.icmp(Predicate::Eq, element, zero);
        fb.terminate(entry, Terminator::Br { target: header });
        fb.terminate(
            header,
            Terminator::CondBr {
                condition: cmp,
                true_target: latch,
                false_target: exit,
            },
        );
        fb.terminate(latch, Terminator::Br { target: header });
        fb.terminate(exit, Terminator::Ret { value: None });
        let func = fb.finish();
        let module = Module {
            functions: vec![func.clone()],
        };
        let classification = classify(&module, SCAN_CLASSIFICATION);
        let results = analyze_function(&func, &classification);
        assert!(!results.has_any_check(0));
    }

    #[test]
    fn fused_or_condition_is_recognized() {
        // icmp eq s[i], 0 fused with another condition via or
        let mut fb = FunctionBuilder::new("scan", &["s"]);
        let entry = fb.block("entry");
        let header = fb.block("header");
        let latch = fb.block("latch");
        let exit = fb.block("exit");
        let zero = fb.const_int(0);
        let goal = fb.const_int(42);
        let index = fb.phi(vec![(zero, entry)]);
        let slot = fb.gep(fb.arg(0), vec![index]);
        let element = fb.load(slot);
        let cmp_goal = fb.icmp(Predicate::Eq, element, goal);
        let cmp_zero = fb.icmp(Predicate::Eq, element, zero);
        let fused = fb.or(cmp_goal, cmp_zero);
        fb.terminate(entry, Terminator::Br { target: header });
        fb.terminate(
            header,
            Terminator::CondBr {
                condition: fused,
                true_target: exit,
                false_target: latch,
            },
        );
        fb.terminate(latch, Terminator::Br { target: header });
        fb.terminate(exit, Terminator::Ret { value: None });
        let func = fb.finish();
        let module = Module {
            functions: vec![func.clone()],
        };
        let classification = classify(&module, SCAN_CLASSIFICATION);
        let results = analyze_function(&func, &classification);
        assert!(results.has_non_optional_check(0));
    }

    #[test]
    fn loop_without_checks_reports_none() {
        let mut fb = FunctionBuilder::new("count", &["n"]);
        let entry = fb.block("entry");
        let header = fb.block("header");
        let latch = fb.block("latch");
        let exit = fb.block("exit");
        let zero = fb.const_int(0);
        let cond = fb.icmp(Predicate::Slt, fb.arg(0), zero);
        fb.terminate(entry, Terminator::Br { target: header });
        fb.terminate(
            header,
            Terminator::CondBr {
                condition: cond,
                true_target: latch,
                false_target: exit,
            },
        );
        fb.terminate(latch, Terminator::Br { target: header });
        fb.terminate(exit, Terminator::Ret { value: None });
        let func = fb.finish();
        let module = Module {
            functions: vec![func.clone()],
        };
        let classification = classify(
            &module,
            r#"{"libraryFunctions": {"count": {"foreignFunctionParameters": [{"parameterAnnotations": []}]}}}"#,
        );
        let results = analyze_function(&func, &classification);
        let lc = results.for_header(1).unwrap();
        assert!(lc.checks.is_empty());
        assert!(lc.optional);
        assert!(!results.has_any_check(0));
    }
}
