//! Interprocedural annotation fixed point
//!
//! Combines three kinds of evidence about each array parameter:
//! intraprocedural loop-exit evidence (a non-optional sentinel check marks
//! the parameter `NullTerminated` on the first sweep), call-graph
//! propagation (an argument flowing into a callee parameter already known
//! to be `NullTerminated` inherits the fact), and the optional-check
//! downgrade to `NonNullTerminated`.
//!
//! Iteration repeats full passes over every array parameter until a pass
//! changes nothing. Each parameter can change at most twice
//! (`DontCare` → `NonNullTerminated` → `NullTerminated`) and the parameter
//! set is finite, so the loop terminates within 2 × |array parameters|
//! passes.

use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::features::array_classification::ArrayClassification;
use crate::features::sentinel_checks::{self, FunctionResults};
use crate::features::value_flow::argument_reaches_value;
use crate::shared::models::{Module, ParamId, ValueDef, ValueId};

use super::answer::Answer;
use super::persistence::{FunctionRecord, ResultsDoc};

/// Fixed-point annotation engine for one module
pub struct NullAnnotationEngine<'m> {
    module: &'m Module,
    classification: &'m ArrayClassification,
    // per-function sentinel results, by function name
    sentinels: FxHashMap<String, FunctionResults>,
    // calls in each function, collected once for repeated scanning
    call_sites: FxHashMap<String, Vec<ValueId>>,
    annotations: FxHashMap<ParamId, Answer>,
    reasons: FxHashMap<ParamId, String>,
}

impl<'m> NullAnnotationEngine<'m> {
    /// Build the engine: runs the sentinel analysis on every function and
    /// indexes call sites of every function with an array parameter.
    pub fn new(module: &'m Module, classification: &'m ArrayClassification) -> Self {
        let mut sentinels = FxHashMap::default();
        for function in &module.functions {
            sentinels.insert(
                function.name.clone(),
                sentinel_checks::analyze_function(function, classification),
            );
        }

        let mut call_sites = FxHashMap::default();
        for name in classification.functions_with_array_parameters() {
            if let Some(function) = module.function(name) {
                let calls = function.call_sites();
                debug!(function = %name, calls = calls.len(), "indexed call sites");
                call_sites.insert(name.to_string(), calls);
            }
        }

        Self {
            module,
            classification,
            sentinels,
            call_sites,
            annotations: FxHashMap::default(),
            reasons: FxHashMap::default(),
        }
    }

    /// Current answer for a parameter (`DontCare` when unrecorded)
    pub fn answer_for(&self, param: &ParamId) -> Answer {
        self.annotations.get(param).copied().unwrap_or_default()
    }

    /// Is this parameter annotated `NullTerminated`?
    pub fn is_null_terminated(&self, param: &ParamId) -> bool {
        self.answer_for(param) == Answer::NullTerminated
    }

    /// Diagnostic reason recorded for a parameter, if any
    pub fn reason_for(&self, param: &ParamId) -> Option<&str> {
        self.reasons.get(param).map(|s| s.as_str())
    }

    /// Sentinel-check results for one function, keyed by loop header
    pub fn sentinel_results(&self, function: &str) -> Option<&FunctionResults> {
        self.sentinels.get(function)
    }

    /// Seed annotations from a previously persisted results file.
    ///
    /// Each entry directly sets a parameter's answer; calling this for
    /// several files gives last-wins semantics per (function, parameter).
    /// Unknown function names and arity mismatches are skipped with a
    /// warning; an invalid annotation code is fatal.
    pub fn populate_from_file(&mut self, path: &Path) -> Result<()> {
        let doc = ResultsDoc::from_file(path)?;
        self.populate(&doc, &path.display().to_string())
    }

    /// Seed annotations from an in-memory results document
    pub fn populate(&mut self, doc: &ResultsDoc, origin: &str) -> Result<()> {
        for (name, record) in &doc.library_functions {
            let Some(function) = self.module.function(name) else {
                warn!(function = %name, origin, "found function in results file but not in module");
                continue;
            };
            if record.argument_annotations.len() != function.params.len() {
                warn!(
                    function = %name,
                    origin,
                    declared = record.argument_annotations.len(),
                    actual = function.params.len(),
                    "arity mismatch between results file and module; skipping"
                );
                continue;
            }
            for (index, &code) in record.argument_annotations.iter().enumerate() {
                let answer = Answer::from_code(code)?;
                self.annotations
                    .insert(ParamId::new(name.clone(), index as u32), answer);
            }
        }
        Ok(())
    }

    fn set(&mut self, param: ParamId, answer: Answer, reason: String) {
        self.annotations.insert(param.clone(), answer);
        self.reasons.insert(param, reason);
    }

    /// Run the fixed point to convergence
    pub fn run(&mut self) {
        // reborrow the module and classification outside `self` so that
        // annotation updates can happen while callee data is in scope
        let module = self.module;
        let classification = self.classification;
        let functions = classification
            .functions_with_array_parameters()
            .into_iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();

        let mut first_time = true;
        loop {
            let mut changed = false;
            for name in &functions {
                let Some(function) = module.function(name) else {
                    continue;
                };
                for &argument in classification.array_parameters_of(name) {
                    let param = ParamId::new(name.clone(), argument);
                    let old_result = self.answer_for(&param);
                    if old_result == Answer::NullTerminated {
                        continue;
                    }

                    if first_time {
                        // loop evidence is a static fact; examine it exactly once
                        let non_optional = self
                            .sentinels
                            .get(name)
                            .map(|checks| checks.has_non_optional_check(argument))
                            .unwrap_or(false);
                        if non_optional {
                            debug!(function = %name, argument, "non-optional sentinel check in some loop");
                            self.set(
                                param,
                                Answer::NullTerminated,
                                "found a non-optional sentinel check in some loop of this function"
                                    .to_string(),
                            );
                            changed = true;
                            continue;
                        }
                    }

                    // evidence from callees
                    let mut found_dont_care = false;
                    let mut found_non_null_terminated = false;
                    let mut next_argument = false;
                    let calls = self.call_sites.get(name.as_str()).cloned().unwrap_or_default();
                    'calls: for call in calls {
                        let ValueDef::Call { callee, args } = function.value(call) else {
                            continue;
                        };
                        let Some(callee_function) = module.function(callee) else {
                            continue;
                        };
                        for (position, &actual) in args.iter().enumerate() {
                            if !argument_reaches_value(function, argument, actual) {
                                continue;
                            }
                            if position >= callee_function.params.len() {
                                continue;
                            }
                            let callee_param = ParamId::new(callee.clone(), position as u32);
                            match self.answer_for(&callee_param) {
                                Answer::NullTerminated => {
                                    debug!(
                                        function = %name,
                                        argument,
                                        callee = %callee,
                                        position,
                                        "propagating NullTerminated from callee"
                                    );
                                    self.set(
                                        param.clone(),
                                        Answer::NullTerminated,
                                        format!(
                                            "called {callee}, marked as null terminated in this position"
                                        ),
                                    );
                                    changed = true;
                                    next_argument = true;
                                    break 'calls;
                                }
                                Answer::NonNullTerminated => {
                                    found_non_null_terminated = true;
                                }
                                Answer::DontCare => {
                                    if found_non_null_terminated {
                                        debug!(
                                            function = %name,
                                            argument,
                                            "both DontCare and NonNullTerminated among callees"
                                        );
                                    }
                                    found_dont_care = true;
                                }
                            }
                        }
                    }
                    if next_argument {
                        continue;
                    }

                    // no positive evidence from calls; an optional sentinel
                    // check still tells us the caller kept its own bound
                    let has_any_check = self
                        .sentinels
                        .get(name)
                        .map(|checks| checks.has_any_check(argument))
                        .unwrap_or(false);
                    if has_any_check && old_result != Answer::NonNullTerminated {
                        debug!(function = %name, argument, "marking NonNullTerminated");
                        if found_dont_care {
                            debug!(
                                function = %name,
                                argument,
                                "marking NonNullTerminated even though some calls say DontCare"
                            );
                        }
                        self.set(
                            param,
                            Answer::NonNullTerminated,
                            "has a loop with an optional sentinel check".to_string(),
                        );
                        changed = true;
                    }
                    // otherwise it stays DontCare for now
                }
            }
            first_time = false;
            if !changed {
                break;
            }
        }
    }

    /// Snapshot every function's final state as a results document
    pub fn results_doc(&self) -> ResultsDoc {
        let mut doc = ResultsDoc::default();
        for function in &self.module.functions {
            let mut record = FunctionRecord::default();
            for (index, param) in function.params.iter().enumerate() {
                let id = ParamId::new(function.name.clone(), index as u32);
                record.argument_names.push(param.name.clone());
                record.argument_annotations.push(self.answer_for(&id).code());
                record
                    .args_array_receivers
                    .push(self.classification.is_array(&id));
                record
                    .argument_reasons
                    .push(self.reason_for(&id).unwrap_or("").to_string());
            }
            doc.library_functions.insert(function.name.clone(), record);
        }
        doc
    }

    /// Persist the final annotation map for downstream consumers
    pub fn dump_to_file(&self, path: &Path) -> Result<()> {
        self.results_doc().write_to_file(path)
    }
}
