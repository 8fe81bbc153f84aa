//! Configuration errors and pretty problem reporting.
//!
//! [`ProblemReporter`] renders lint problems with
//! [ariadne](https://crates.io/crates/ariadne), pointing at the offending
//! character in the source:
//!
//! ```rust
//! use yamlstyle_lint::error::ProblemReporter;
//! use yamlstyle_lint::LintProblem;
//!
//! let source = "a:\n   b: 1\n";
//! let reporter = ProblemReporter::new("example.yaml", source);
//! let problem = LintProblem::new(2, 4, "wrong indentation: expected 2 but found 3");
//! let rendered = reporter.render(&problem).unwrap();
//! assert!(rendered.contains("wrong indentation"));
//! ```

use std::ops::Range;
use std::path::PathBuf;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::problem::{Level, LintProblem};

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("invalid config: no such rule: \"{0}\"")]
    UnknownRule(String),

    #[error("invalid config: rule \"{rule}\": {message}")]
    InvalidOption { rule: String, message: String },

    #[error("cannot read config file {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
}

/// Renders lint problems against their source with ariadne.
pub struct ProblemReporter<'src> {
    source_name: String,
    source: &'src str,
    color: bool,
}

impl<'src> ProblemReporter<'src> {
    pub fn new(source_name: impl Into<String>, source: &'src str) -> Self {
        Self {
            source_name: source_name.into(),
            source,
            color: true,
        }
    }

    /// Disables ANSI colors in the output.
    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    /// Byte range of the character a problem points at.
    fn span(&self, problem: &LintProblem) -> Range<usize> {
        let line_start = self
            .source
            .split_inclusive('\n')
            .take(problem.line.saturating_sub(1))
            .map(str::len)
            .sum::<usize>()
            .min(self.source.len());
        let line = &self.source[line_start..];
        let offset = line
            .char_indices()
            .nth(problem.column.saturating_sub(1))
            .map(|(i, _)| line_start + i)
            .unwrap_or(self.source.len());
        let end = self.source[offset..]
            .chars()
            .next()
            .map(|c| offset + c.len_utf8())
            .unwrap_or(offset);
        offset..end
    }

    fn build(&self, problem: &LintProblem) -> Report<'_, (&String, Range<usize>)> {
        let span = self.span(problem);
        let (kind, color) = match problem.level {
            Level::Error => (ReportKind::Error, Color::Red),
            Level::Warning => (ReportKind::Warning, Color::Yellow),
        };

        let mut label = Label::new((&self.source_name, span.clone())).with_message(&problem.desc);
        if self.color {
            label = label.with_color(color);
        }

        let mut report = Report::build(kind, &self.source_name, span.start)
            .with_config(Config::default().with_color(self.color))
            .with_message(&problem.desc)
            .with_label(label);

        if let Some(rule) = &problem.rule {
            report = report.with_note(format!("rule: {}", rule));
        }

        report.finish()
    }

    /// Renders a problem to a string.
    pub fn render(&self, problem: &LintProblem) -> std::io::Result<String> {
        let mut out = Vec::new();
        self.build(problem)
            .write((&self.source_name, Source::from(self.source)), &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Prints a problem to stderr.
    pub fn report(&self, problem: &LintProblem) -> std::io::Result<()> {
        self.build(problem)
            .eprint((&self.source_name, Source::from(self.source)))
    }
}
