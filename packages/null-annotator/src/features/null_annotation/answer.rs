//! Three-valued annotation lattice
//!
//! `DontCare` is the bottom / unknown element; `NullTerminated` and
//! `NonNullTerminated` are incomparable facts. A parameter only ever moves
//! from `DontCare` toward a definite answer, and `NullTerminated` is
//! absorbing: once set it is never revisited.

use serde::{Deserialize, Serialize};

use crate::errors::{AnnotatorError, Result};

/// Annotation answer for one parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    /// No evidence either way
    DontCare,
    /// Evidence the array is not sentinel-terminated
    NonNullTerminated,
    /// Evidence the array is sentinel-terminated
    NullTerminated,
}

impl Answer {
    /// Integer code used by the persisted results format
    pub fn code(self) -> u8 {
        match self {
            Answer::DontCare => 0,
            Answer::NonNullTerminated => 1,
            Answer::NullTerminated => 2,
        }
    }

    /// Decode a persisted integer code
    ///
    /// An out-of-range code means a corrupted or hand-edited results file;
    /// that is an unrecoverable input error.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Answer::DontCare),
            1 => Ok(Answer::NonNullTerminated),
            2 => Ok(Answer::NullTerminated),
            other => Err(AnnotatorError::internal(format!(
                "invalid annotation code {other} in results file"
            ))),
        }
    }
}

impl Default for Answer {
    fn default() -> Self {
        Answer::DontCare
    }
}
