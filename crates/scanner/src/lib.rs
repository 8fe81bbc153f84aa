//! # yamlstyle-scanner
//!
//! A YAML 1.1 scanner that produces the token stream the `yamlstyle` lint
//! rules consume.
//!
//! The scanner follows the libyaml/PyYAML family closely, because style rules
//! are written against the token stream those scanners produce, quirks
//! included. Each token carries a start and an end [`Mark`] (byte offset,
//! 0-based line, 0-based character column), comments are collected on the side,
//! and scanning stops at the first syntax error while keeping every token
//! produced before it.
//!
//! ## Quick Start
//!
//! ```rust
//! use yamlstyle_scanner::{tokenize, TokenKind};
//!
//! let scanned = tokenize("list:\n- a  # first\n- b\n");
//! assert!(scanned.error.is_none());
//!
//! // No BLOCK-SEQUENCE-START for a sequence that is not indented under its key.
//! assert!(!scanned
//!     .tokens
//!     .iter()
//!     .any(|t| t.kind == TokenKind::BlockSequenceStart));
//! assert_eq!(scanned.comments[0].text, "# first");
//! ```
//!
//! ## Module Overview
//!
//! - [`token`] - Token, mark and comment types
//! - [`scanner`] - The scanner itself and [`tokenize()`]
//! - [`error`] - [`ScanError`]

pub mod error;
pub mod scanner;
pub mod token;

pub use error::ScanError;
pub use scanner::{tokenize, Scanner, Tokenized};
pub use token::{Comment, Mark, ScalarStyle, Span, Token, TokenKind};
