//! Array-classification reader
//!
//! Parses the external classification results (JSON) against a loaded
//! module and records which formal parameters are believed to be arrays.
//! This is a pure classifier: it only records membership, never
//! annotations.
//!
//! Non-fatal problems (unknown function name, arity mismatch) are logged
//! and the offending record is skipped; malformed JSON is fatal since the
//! downstream analyses cannot run without their classification seed.

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use tracing::warn;

use crate::errors::Result;
use crate::shared::models::{Module, ParamId};

/// Annotation tag marking a parameter as an array
pub const ARRAY_MARKER: &str = "PAArray";

#[derive(Debug, Deserialize)]
struct ClassificationDoc {
    #[serde(rename = "libraryFunctions")]
    library_functions: BTreeMap<String, LibraryFunction>,
}

#[derive(Debug, Deserialize)]
struct LibraryFunction {
    #[serde(rename = "foreignFunctionParameters")]
    parameters: Vec<ForeignParameter>,
}

#[derive(Debug, Deserialize)]
struct ForeignParameter {
    #[serde(rename = "parameterAnnotations")]
    annotations: Vec<String>,
}

/// Which parameters are arrays, recorded bidirectionally
#[derive(Debug, Default)]
pub struct ArrayClassification {
    arrays: FxHashSet<ParamId>,
    // function -> ordinals of its array parameters, ascending
    by_function: FxHashMap<String, Vec<u32>>,
}

impl ArrayClassification {
    /// Parse classification results from a JSON string
    pub fn from_json_str(json: &str, module: &Module) -> Result<Self> {
        let doc: ClassificationDoc = serde_json::from_str(json)?;
        let mut classification = ArrayClassification::default();

        for (name, record) in &doc.library_functions {
            let Some(function) = module.function(name) else {
                warn!(function = %name, "found function in classification results but not in module");
                continue;
            };
            if record.parameters.len() != function.params.len() {
                warn!(
                    function = %name,
                    declared = record.parameters.len(),
                    actual = function.params.len(),
                    "arity mismatch between classification results and module; skipping"
                );
                continue;
            }
            for (index, parameter) in record.parameters.iter().enumerate() {
                if parameter.annotations.iter().any(|tag| tag == ARRAY_MARKER) {
                    classification
                        .arrays
                        .insert(ParamId::new(name.clone(), index as u32));
                    classification
                        .by_function
                        .entry(name.clone())
                        .or_default()
                        .push(index as u32);
                }
            }
        }
        Ok(classification)
    }

    /// Load classification results from a JSON file
    pub fn from_file(path: &Path, module: &Module) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents, module)
    }

    /// Is this parameter classified as an array?
    pub fn is_array(&self, param: &ParamId) -> bool {
        self.arrays.contains(param)
    }

    /// Is parameter `index` of `function` classified as an array?
    pub fn is_array_parameter(&self, function: &str, index: u32) -> bool {
        self.by_function
            .get(function)
            .map(|ordinals| ordinals.contains(&index))
            .unwrap_or(false)
    }

    /// Ordinals of the array parameters of a function, ascending
    pub fn array_parameters_of(&self, function: &str) -> &[u32] {
        self.by_function
            .get(function)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Names of all functions with at least one array parameter, sorted
    pub fn functions_with_array_parameters(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_function.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}
