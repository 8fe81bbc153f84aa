//! # yamlstyle
//!
//! A style linter for YAML, built around an indentation rule that infers the
//! expected indent of every line from the document's structure.
//!
//! | Crate | Description |
//! |-------|-------------|
//! | [`scanner`] | YAML token scanner with marks and comments |
//! | [`lint`] | Rules, configuration, directives and the lint driver |
//!
//! The `yamlstyle` binary lives in the `yamlstyle-cli` crate.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! yamlstyle = "0.0.1-beta.3"
//! ```
//!
//! ```rust
//! use yamlstyle::{lint, LintConfig};
//!
//! let problems = lint("a: 1\na: 2\n", &LintConfig::default()).unwrap();
//! assert_eq!(problems[0].to_string(), "duplication of key \"a\" in mapping (key-duplicates)");
//! ```

pub use yamlstyle_lint as lint;
pub use yamlstyle_scanner as scanner;

pub use yamlstyle_lint::{lint, ConfigError, Level, LintConfig, LintProblem, Linter};
pub use yamlstyle_scanner::tokenize;
