/*
 * null-annotator - NUL-termination inference for array parameters
 *
 * Static-analysis passes over an SSA intermediate representation that
 * infer, per pointer-typed array parameter, whether the array is
 * sentinel-terminated:
 * - shared/   : IR data models (module, values, CFG, loops)
 * - features/ : analysis passes (classification, value flow, sentinel
 *               checks, length checks, the annotation fixed point)
 * - config/   : run configuration
 *
 * The analysis is read-only and best-effort: parameters without evidence
 * stay at the explicit "don't care" answer.
 */

#![allow(clippy::collapsible_if)] // Readability over brevity
#![allow(clippy::new_without_default)] // Default impl not always needed

/// Shared IR models
pub mod shared;

/// Analysis features
pub mod features;

/// Run configuration
pub mod config;

/// Error types
pub mod errors;

pub use config::AnnotatorConfig;
pub use errors::{AnnotatorError, Result};
pub use features::array_classification::ArrayClassification;
pub use features::null_annotation::{Answer, NullAnnotationEngine, ResultsDoc};
pub use shared::models::{Module, ParamId};
