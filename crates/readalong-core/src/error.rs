//! Error types for values parsed at the edges of the engine.
//!
//! The scoring and difficulty operations themselves are total. These errors
//! only arise when untyped input (CLI arguments, question-bank files, stored
//! reports) is converted into the engine's typed model.

use thiserror::Error;

/// A grade or grade band that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    /// The grade string is not one of "1" through "8".
    #[error("grade must be between 1 and 8, got '{0}'")]
    OutOfRange(String),

    /// The band string is not one of "1-2", "3-4", "5-6", "7-8".
    #[error("unknown grade band: '{0}'")]
    UnknownBand(String),
}

/// A difficulty modifier outside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("difficulty modifier must be between -2 and 2, got {0}")]
pub struct ModifierError(pub i64);
