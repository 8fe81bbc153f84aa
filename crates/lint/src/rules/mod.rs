//! Rule dispatch protocol and the registry of built-in rules.
//!
//! Three rule shapes exist:
//!
//! - [`TokenRule`]: called once per token with a four-token window
//!   ([`TokenWindow`]) and a mutable per-pass context;
//! - [`LineRule`]: called once per physical line;
//! - [`CommentRule`]: called once per comment.
//!
//! A token rule's context is its associated `Context` type. The driver creates
//! a fresh one for every input it lints, so nothing leaks from one file to
//! the next and a rule value can be shared between concurrent passes.
//!
//! Built-in rules are listed in [`RULES`]; each entry knows how to build the
//! rule from its options.

use serde_json::{Map, Value};
use yamlstyle_scanner::{Comment, Token};

use crate::error::ConfigError;
use crate::problem::LintProblem;

pub mod anchors;
pub mod indentation;
pub mod key_duplicates;

/// Options of one rule, as found in the configuration (without `level`).
pub type RuleOptions = Map<String, Value>;

/// The token being checked and its neighbours.
#[derive(Debug, Clone, Copy)]
pub struct TokenWindow<'a> {
    /// The whole source being linted.
    pub source: &'a str,
    pub token: &'a Token,
    pub prev: Option<&'a Token>,
    pub next: Option<&'a Token>,
    pub next_next: Option<&'a Token>,
}

/// A rule fed with every token of the stream, in order.
pub trait TokenRule: Send + Sync + 'static {
    /// Per-pass state, created fresh for every linted input.
    type Context: Default;

    fn id(&self) -> &'static str;

    fn check(&self, window: &TokenWindow<'_>, cx: &mut Self::Context) -> Vec<LintProblem>;
}

/// One physical line of the source, without its line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number.
    pub line_no: usize,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past the last character (before `\r\n` or `\n`).
    pub end: usize,
    pub source: &'a str,
}

impl<'a> Line<'a> {
    pub fn text(&self) -> &'a str {
        &self.source[self.start..self.end]
    }
}

/// Splits a source into physical lines. The last line is always produced,
/// even when it is empty.
pub fn lines(source: &str) -> impl Iterator<Item = Line<'_>> + '_ {
    let mut start = 0;
    let mut line_no = 0;
    let mut finished = false;
    std::iter::from_fn(move || {
        if finished {
            return None;
        }
        line_no += 1;
        match source[start..].find('\n') {
            Some(pos) => {
                let newline = start + pos;
                let end = if newline > start && source.as_bytes()[newline - 1] == b'\r' {
                    newline - 1
                } else {
                    newline
                };
                let line = Line { line_no, start, end, source };
                start = newline + 1;
                Some(line)
            }
            None => {
                finished = true;
                Some(Line { line_no, start, end: source.len(), source })
            }
        }
    })
}

/// A rule fed with every physical line.
pub trait LineRule: Send + Sync {
    fn id(&self) -> &'static str;

    fn check(&self, line: &Line<'_>) -> Vec<LintProblem>;
}

/// A rule fed with every comment.
pub trait CommentRule: Send + Sync {
    fn id(&self) -> &'static str;

    fn check(&self, comment: &Comment, source: &str) -> Vec<LintProblem>;
}

/// A token rule bound to one pass over one input.
pub trait TokenPass {
    fn check(&mut self, window: &TokenWindow<'_>) -> Vec<LintProblem>;
}

struct Pass<'r, R: TokenRule> {
    rule: &'r R,
    cx: R::Context,
}

impl<R: TokenRule> TokenPass for Pass<'_, R> {
    fn check(&mut self, window: &TokenWindow<'_>) -> Vec<LintProblem> {
        self.rule.check(window, &mut self.cx)
    }
}

/// Object-safe view of a [`TokenRule`], for storing rules with different
/// context types side by side.
pub trait DynTokenRule: Send + Sync {
    fn start_pass(&self) -> Box<dyn TokenPass + '_>;
}

impl<R: TokenRule> DynTokenRule for R {
    fn start_pass(&self) -> Box<dyn TokenPass + '_> {
        Box::new(Pass { rule: self, cx: R::Context::default() })
    }
}

/// A built-in rule.
pub struct RuleEntry {
    pub id: &'static str,
    pub description: &'static str,
    pub build: fn(&RuleOptions) -> Result<Box<dyn DynTokenRule>, ConfigError>,
}

impl std::fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEntry").field("id", &self.id).finish()
    }
}

/// All built-in rules.
pub static RULES: &[RuleEntry] = &[
    RuleEntry {
        id: anchors::ID,
        description: "Report undeclared aliases and duplicated or unused anchors",
        build: anchors::build,
    },
    RuleEntry {
        id: indentation::ID,
        description: "Check that indentation is consistent across the document",
        build: indentation::build,
    },
    RuleEntry {
        id: key_duplicates::ID,
        description: "Report keys repeated in the same mapping",
        build: key_duplicates::build,
    },
];

/// Looks up a built-in rule by id.
pub fn get(id: &str) -> Option<&'static RuleEntry> {
    RULES.iter().find(|entry| entry.id == id)
}

/// Deserializes a rule's options, mapping failures to [`ConfigError::InvalidOption`].
pub(crate) fn parse_options<T: serde::de::DeserializeOwned>(
    rule: &str,
    options: &RuleOptions,
) -> Result<T, ConfigError> {
    serde_json::from_value(Value::Object(options.clone())).map_err(|e| ConfigError::InvalidOption {
        rule: rule.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lines_split() {
        let collected: Vec<_> = lines("a\r\nbc\n\nd").map(|l| (l.line_no, l.text())).collect();
        assert_eq!(collected, vec![(1, "a"), (2, "bc"), (3, ""), (4, "d")]);
    }

    #[test]
    fn test_lines_trailing_newline_yields_empty_last_line() {
        let collected: Vec<_> = lines("a\n").map(|l| l.text()).collect();
        assert_eq!(collected, vec!["a", ""]);
    }

    #[test]
    fn test_registry_lookup() {
        assert!(get("indentation").is_some());
        assert!(get("key-duplicates").is_some());
        assert!(get("anchors").is_some());
        assert!(get("line-length").is_none());
        let ids: Vec<_> = RULES.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["anchors", "indentation", "key-duplicates"]);
    }

    #[test]
    fn test_build_rejects_unknown_option() {
        let mut options = RuleOptions::new();
        options.insert("tabs".into(), Value::Bool(true));
        let err = (get("indentation").unwrap().build)(&options).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidOption { ref rule, .. } if rule == "indentation"));
    }
}
