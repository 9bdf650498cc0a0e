//! Shared IR fixtures for the integration suites
#![allow(dead_code)] // each suite uses its own subset

use null_annotator::shared::models::{Function, FunctionBuilder, Predicate, Terminator};

/// `while (s[i] != 0) i++;` - one loop whose sole exit is the sentinel check
pub fn scan_function(name: &str) -> Function {
    let mut fb = FunctionBuilder::new(name, &["s"]);
    let entry = fb.block("entry");
    let header = fb.block("header");
    let latch = fb.block("latch");
    let exit = fb.block("exit");
    let zero = fb.const_int(0);
    let one = fb.const_int(1);
    let index = fb.phi(vec![(zero, entry), (one, latch)]);
    let slot = fb.gep(fb.arg(0), vec![index]);
    let element = fb.load(slot);
    let cmp = fb.icmp(Predicate::Eq, element, zero);
    fb.terminate(entry, Terminator::Br { target: header });
    fb.terminate(
        header,
        Terminator::CondBr {
            condition: cmp,
            true_target: exit,
            false_target: latch,
        },
    );
    fb.terminate(latch, Terminator::Br { target: header });
    fb.terminate(exit, Terminator::Ret { value: None });
    fb.finish()
}

/// Scan loop on param 0 with a second exit that bypasses the check
pub fn bypassable_scan_function(name: &str) -> Function {
    let mut fb = FunctionBuilder::new(name, &["s", "n"]);
    let entry = fb.block("entry");
    let header = fb.block("header");
    let check = fb.block("check");
    let latch = fb.block("latch");
    let exit = fb.block("exit");
    let zero = fb.const_int(0);
    let one = fb.const_int(1);
    let index = fb.phi(vec![(zero, entry), (one, latch)]);
    let bound = fb.icmp(Predicate::Slt, index, fb.arg(1));
    let slot = fb.gep(fb.arg(0), vec![index]);
    let element = fb.load(slot);
    let cmp = fb.icmp(Predicate::Eq, element, zero);
    let skip = fb.icmp(Predicate::Eq, index, fb.arg(1));
    fb.terminate(entry, Terminator::Br { target: header });
    // the header can route straight to the latch, bypassing the check
    fb.terminate(
        header,
        Terminator::CondBr {
            condition: skip,
            true_target: latch,
            false_target: check,
        },
    );
    fb.terminate(
        check,
        Terminator::CondBr {
            condition: cmp,
            true_target: exit,
            false_target: latch,
        },
    );
    fb.terminate(
        latch,
        Terminator::CondBr {
            condition: bound,
            true_target: header,
            false_target: exit,
        },
    );
    fb.terminate(exit, Terminator::Ret { value: None });
    fb.finish()
}

/// `find(s1, s2, n)`: two independent loops, each sentinel-checking one
/// array and breaking out without an alternate exit from the check
pub fn two_array_find(name: &str) -> Function {
    let mut fb = FunctionBuilder::new(name, &["s1", "s2", "n"]);
    let entry = fb.block("entry");
    let h1 = fb.block("loop1.header");
    let c1 = fb.block("loop1.check");
    let l1 = fb.block("loop1.latch");
    let mid = fb.block("between");
    let h2 = fb.block("loop2.header");
    let c2 = fb.block("loop2.check");
    let l2 = fb.block("loop2.latch");
    let exit = fb.block("exit");
    let zero = fb.const_int(0);
    let one = fb.const_int(1);

    let i1 = fb.phi(vec![(zero, entry), (one, l1)]);
    let slot1 = fb.gep(fb.arg(0), vec![i1]);
    let elem1 = fb.load(slot1);
    let cmp1 = fb.icmp(Predicate::Eq, elem1, zero);

    let i2 = fb.phi(vec![(zero, mid), (one, l2)]);
    let slot2 = fb.gep(fb.arg(1), vec![i2]);
    let elem2 = fb.load(slot2);
    let cmp2 = fb.icmp(Predicate::Eq, elem2, zero);

    fb.terminate(entry, Terminator::Br { target: h1 });
    fb.terminate(h1, Terminator::Br { target: c1 });
    fb.terminate(
        c1,
        Terminator::CondBr {
            condition: cmp1,
            true_target: mid,
            false_target: l1,
        },
    );
    fb.terminate(l1, Terminator::Br { target: h1 });
    fb.terminate(mid, Terminator::Br { target: h2 });
    fb.terminate(h2, Terminator::Br { target: c2 });
    fb.terminate(
        c2,
        Terminator::CondBr {
            condition: cmp2,
            true_target: exit,
            false_target: l2,
        },
    );
    fb.terminate(l2, Terminator::Br { target: h2 });
    fb.terminate(exit, Terminator::Ret { value: None });
    fb.finish()
}

/// Caller whose array parameter flows (through a phi) into the callee
pub fn passthrough_caller(name: &str, callee: &str) -> Function {
    let mut fb = FunctionBuilder::new(name, &["p"]);
    let entry = fb.block("entry");
    let next = fb.block("next");
    let joined = fb.phi(vec![(fb.arg(0), entry)]);
    fb.call(callee, vec![joined]);
    fb.terminate(entry, Terminator::Br { target: next });
    fb.terminate(next, Terminator::Ret { value: None });
    fb.finish()
}

/// Caller that passes a value unrelated to its own array parameter
pub fn unrelated_caller(name: &str, callee: &str) -> Function {
    let mut fb = FunctionBuilder::new(name, &["p"]);
    fb.block("entry");
    let local = fb.opaque(vec![]);
    fb.call(callee, vec![local]);
    fb.finish()
}

/// Function with no loops and no calls
pub fn inert_function(name: &str) -> Function {
    let mut fb = FunctionBuilder::new(name, &["p"]);
    fb.block("entry");
    fb.finish()
}

/// Classification JSON for `(function, per-parameter is-array flags)` pairs
pub fn classification_json(funcs: &[(&str, &[bool])]) -> String {
    let mut library = serde_json::Map::new();
    for (name, arrays) in funcs {
        let params: Vec<serde_json::Value> = arrays
            .iter()
            .map(|&is_array| {
                let tags: Vec<&str> = if is_array { vec!["PAArray"] } else { vec![] };
                serde_json::json!({ "parameterAnnotations": tags })
            })
            .collect();
        library.insert(
            name.to_string(),
            serde_json::json!({ "foreignFunctionParameters": params }),
        );
    }
    serde_json::json!({ "libraryFunctions": library }).to_string()
}
