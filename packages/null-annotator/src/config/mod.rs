//! Run configuration
//!
//! Explicit configuration passed to the driver at call time; there are no
//! process-wide option registries.

use std::path::PathBuf;

/// File paths for one analysis run
#[derive(Debug, Clone, Default)]
pub struct AnnotatorConfig {
    /// Array-classification results (required input)
    pub classification_file: PathBuf,
    /// Prior annotation results for dependencies; later files win on
    /// conflicting (function, parameter) entries
    pub dependency_files: Vec<PathBuf>,
    /// Where to persist this run's results; `None` computes without
    /// persisting
    pub output_file: Option<PathBuf>,
}
