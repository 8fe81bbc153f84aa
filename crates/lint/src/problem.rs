use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Warning,
    #[default]
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Warning => write!(f, "warning"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// A style problem found in the source.
///
/// `line` and `column` are 1-based. Problems order by position, then by
/// message, rule and level.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LintProblem {
    pub line: usize,
    pub column: usize,
    pub desc: String,
    /// Id of the rule that found the problem, `None` for syntax errors.
    pub rule: Option<String>,
    pub level: Level,
}

impl LintProblem {
    pub fn new(line: usize, column: usize, desc: impl Into<String>) -> Self {
        Self {
            line,
            column,
            desc: desc.into(),
            rule: None,
            level: Level::Error,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LintProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule {
            Some(rule) => write!(f, "{} ({})", self.desc, rule),
            None => write!(f, "{}", self.desc),
        }
    }
}

impl PartialOrd for LintProblem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LintProblem {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.line, self.column, &self.desc, &self.rule, self.level).cmp(&(
            other.line,
            other.column,
            &other.desc,
            &other.rule,
            other.level,
        ))
    }
}
