//! Annotation results file format
//!
//! JSON document with a top-level `library_functions` map from function
//! name to parallel ordered lists: parameter names, integer-coded answers,
//! array-classification flags, and free-text reasons. The same format is
//! read back as a dependency input when analyzing a module separately from
//! the libraries it links against.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Record for one function: parallel lists, one entry per parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub argument_names: Vec<String>,
    pub argument_annotations: Vec<u8>,
    pub args_array_receivers: Vec<bool>,
    pub argument_reasons: Vec<String>,
}

/// Whole results document
///
/// `BTreeMap` keeps serialized output in sorted order for stable diffs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsDoc {
    pub library_functions: BTreeMap<String, FunctionRecord>,
}

impl ResultsDoc {
    /// Parse a results document from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a results document from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize to a JSON string
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write to a JSON file
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_round_trips_through_json() {
        let mut doc = ResultsDoc::default();
        doc.library_functions.insert(
            "find".to_string(),
            FunctionRecord {
                argument_names: vec!["s".to_string(), "n".to_string()],
                argument_annotations: vec![2, 0],
                args_array_receivers: vec![true, false],
                argument_reasons: vec!["checked".to_string(), String::new()],
            },
        );
        let json = doc.to_json_string().unwrap();
        assert_eq!(ResultsDoc::from_json_str(&json).unwrap(), doc);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(ResultsDoc::from_json_str("]").is_err());
    }
}
