//! # yamlstyle-lint
//!
//! Style rules for YAML documents and the driver that runs them.
//!
//! The rules work on the token stream of
//! [`yamlstyle_scanner`](yamlstyle_scanner), so they see the document as
//! written: indentation, comments and layout are all still there. The core
//! rule is [`indentation`](rules::indentation), which infers the expected
//! indent of every line from the structure around it.
//!
//! ## Quick Start
//!
//! ```rust
//! use yamlstyle_lint::{lint, LintConfig};
//!
//! let source = "object:\n  k1:\n   - a\n";
//! let config = LintConfig::from_json(r#"{"rules": {"indentation": {"spaces": 2}}}"#).unwrap();
//!
//! let problems = lint(source, &config).unwrap();
//! assert_eq!(problems.len(), 1);
//! assert_eq!((problems[0].line, problems[0].column), (3, 4));
//! assert_eq!(
//!     problems[0].to_string(),
//!     "wrong indentation: expected 4 but found 3 (indentation)"
//! );
//! ```
//!
//! ## Rules
//!
//! | Rule | Checks |
//! |------|--------|
//! | `indentation` | Indentation width, sequence indentation, multi-line scalars |
//! | `key-duplicates` | Keys repeated in the same mapping |
//! | `anchors` | Undeclared aliases, duplicated and unused anchors |
//!
//! Rules can be switched off from the source with directives, see
//! [`directives`].
//!
//! ## Module Overview
//!
//! - [`linter`] - The driver, [`Linter`]
//! - [`rules`] - Rule protocol and built-in rules
//! - [`config`] - JSON configuration
//! - [`directives`] - `# yamlstyle disable` and friends
//! - [`problem`] - [`LintProblem`] and [`Level`]
//! - [`error`] - [`ConfigError`] and the ariadne [`ProblemReporter`]
//!
//! ## Feature Flags
//!
//! - `wasm` - Enable WebAssembly bindings for browser use

pub mod config;
pub mod directives;
pub mod error;
pub mod linter;
pub mod problem;
pub mod rules;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{LintConfig, RuleConfig};
pub use error::{ConfigError, ProblemReporter};
pub use linter::Linter;
pub use problem::{Level, LintProblem};
pub use rules::{CommentRule, LineRule, TokenRule, TokenWindow};

/// Lints `source` with the rules `config` enables.
pub fn lint(source: &str, config: &LintConfig) -> Result<Vec<LintProblem>, ConfigError> {
    Ok(Linter::from_config(config)?.lint(source))
}
