//! Scanner errors.

use crate::token::Mark;
use thiserror::Error;

/// A syntax error found while scanning.
///
/// The scanner stops at the first error; every token produced before it is
/// still valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{problem} (line {}, column {})", .mark.line + 1, .mark.column + 1)]
pub struct ScanError {
    pub problem: String,
    pub mark: Mark,
}

impl ScanError {
    pub fn new(problem: impl Into<String>, mark: Mark) -> Self {
        Self { problem: problem.into(), mark }
    }

    /// 1-based line of the error.
    pub fn line(&self) -> usize {
        self.mark.line + 1
    }

    /// 1-based column of the error.
    pub fn column(&self) -> usize {
        self.mark.column + 1
    }
}

/// Result type for scanner operations.
pub type Result<T> = std::result::Result<T, ScanError>;
